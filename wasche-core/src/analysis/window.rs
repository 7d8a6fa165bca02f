//! Fixed-capacity sample window
//!
//! Three parallel ring buffers (one per axis) sharing a single write cursor
//! and fill count, so they behave as one ring of (x, y, z) tuples. Once full,
//! each push silently overwrites the oldest sample.

use super::sample::{RawSample, Sample};

/// Ring buffer of the most recent `N` samples
///
/// `N` must be a power of two; this is checked at compile time when the
/// window is constructed.
#[derive(Debug, Clone)]
pub struct SampleWindow<const N: usize> {
    x: [f32; N],
    y: [f32; N],
    z: [f32; N],
    /// Next slot to write
    cursor: usize,
    /// Samples collected, saturating at N
    collected: usize,
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleWindow<N> {
    const CAPACITY_IS_POWER_OF_TWO: () = assert!(
        N.is_power_of_two() && N >= 2,
        "sample window capacity must be a power of two"
    );

    /// Create an empty window
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_IS_POWER_OF_TWO;

        Self {
            x: [0.0; N],
            y: [0.0; N],
            z: [0.0; N],
            cursor: 0,
            collected: 0,
        }
    }

    /// Zero all buffers, the cursor and the fill count
    pub fn reset(&mut self) {
        self.x = [0.0; N];
        self.y = [0.0; N];
        self.z = [0.0; N];
        self.cursor = 0;
        self.collected = 0;
    }

    /// Convert a raw reading to g and store it as the newest sample
    pub fn push(&mut self, raw: RawSample) {
        let sample = raw.to_g();

        self.x[self.cursor] = sample.x;
        self.y[self.cursor] = sample.y;
        self.z[self.cursor] = sample.z;

        self.cursor = (self.cursor + 1) % N;
        if self.collected < N {
            self.collected += 1;
        }
    }

    /// True once N samples have been collected
    pub fn is_full(&self) -> bool {
        self.collected == N
    }

    /// Number of samples held (never more than N)
    pub fn len(&self) -> usize {
        self.collected
    }

    pub fn is_empty(&self) -> bool {
        self.collected == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Slot the next sample will be written to
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Iterate held samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        let start = (self.cursor + N - self.collected) % N;
        (0..self.collected).map(move |i| self.slot((start + i) % N))
    }

    /// Per-sample magnitudes, oldest first
    ///
    /// Slots not yet written read as zero.
    pub fn magnitudes(&self) -> [f32; N] {
        let mut out = [0.0; N];
        for (slot, sample) in out.iter_mut().zip(self.iter()) {
            *slot = sample.magnitude();
        }
        out
    }

    fn slot(&self, index: usize) -> Sample {
        Sample {
            x: self.x[index],
            y: self.y[index],
            z: self.z[index],
        }
    }
}
