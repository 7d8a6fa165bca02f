//! Vibration metrics
//!
//! Scalar summaries of a full window: RMS energy of the magnitude sequence
//! and the dominant frequency of its lower half-spectrum.

use super::spectrum::{fft, Complex};

/// Root-mean-square of `buffer`
///
/// Returns 0.0 for an empty buffer.
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = buffer.iter().map(|v| v * v).sum();
    libm::sqrtf(sum_sq / buffer.len() as f32)
}

/// Index of the strongest bin in `1 .. N/2`
///
/// DC (bin 0) and the mirrored upper half are skipped. The scan starts with
/// bin 1 as the candidate and only moves on a strictly greater magnitude, so
/// ties go to the lower bin and bin 1 is reported when nothing beats it,
/// even if no bin stands out at all.
pub fn dominant_bin(spectrum: &[Complex]) -> usize {
    let mut max_magnitude = 0.0f32;
    let mut max_index = 1;

    for (i, bin) in spectrum
        .iter()
        .enumerate()
        .take(spectrum.len() / 2)
        .skip(1)
    {
        let magnitude = bin.norm();
        if magnitude > max_magnitude {
            max_magnitude = magnitude;
            max_index = i;
        }
    }

    max_index
}

/// Frequency of bin `index` for an `n`-point transform (Hz)
pub fn bin_to_hz(index: usize, sample_rate_hz: f32, n: usize) -> f32 {
    index as f32 * sample_rate_hz / n as f32
}

/// Dominant frequency of a magnitude sequence (Hz)
///
/// Runs the FFT over `magnitudes` (imaginary parts zero) and converts the
/// dominant bin to Hz. Resolution is `sample_rate_hz / N`.
pub fn dominant_frequency<const N: usize>(magnitudes: &[f32; N], sample_rate_hz: f32) -> f32 {
    let mut spectrum = [Complex::ZERO; N];
    for (bin, &m) in spectrum.iter_mut().zip(magnitudes.iter()) {
        *bin = Complex::from_real(m);
    }

    fft(&mut spectrum);

    bin_to_hz(dominant_bin(&spectrum), sample_rate_hz, N)
}
