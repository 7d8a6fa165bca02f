//! Vibration analysis pipeline
//!
//! Data flows one way:
//!
//! ```text
//! RawSample ─▶ SampleWindow ─(full)─▶ magnitudes ─┬─▶ rms ───────────────┐
//!                                                 └─▶ fft ─▶ dominant Hz ─┴─▶ classify ─▶ VibrationResult
//! ```

pub mod classifier;
pub mod metrics;
pub mod result;
pub mod sample;
pub mod spectrum;
pub mod window;

pub use classifier::MachineState;
pub use metrics::{dominant_frequency, rms};
pub use result::VibrationResult;
pub use sample::{RawSample, Sample, G_PER_COUNT};
pub use spectrum::{fft, Complex};
pub use window::SampleWindow;

use crate::config::NodeConfig;

/// Analyse a full window
///
/// Returns `None` until the window holds N samples.
pub fn analyze<const N: usize>(
    window: &SampleWindow<N>,
    config: &NodeConfig,
    timestamp: u32,
) -> Option<VibrationResult> {
    if !window.is_full() {
        return None;
    }

    let magnitudes = window.magnitudes();
    let rms_magnitude = rms(&magnitudes);
    let dominant_freq = dominant_frequency(&magnitudes, config.sample_rate_hz as f32);
    let state = MachineState::classify(rms_magnitude, dominant_freq, &config.thresholds);

    Some(VibrationResult {
        rms_magnitude,
        dominant_freq,
        state,
        timestamp,
    })
}
