//! Accelerometer samples

/// Full-resolution accelerometer scale (g per count, 4 mg/LSB)
pub const G_PER_COUNT: f32 = 0.004;

/// Raw 3-axis reading in sensor counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Convert counts to acceleration in g
    pub fn to_g(self) -> Sample {
        Sample {
            x: self.x as f32 * G_PER_COUNT,
            y: self.y as f32 * G_PER_COUNT,
            z: self.z as f32 * G_PER_COUNT,
        }
    }
}

/// 3-axis acceleration in g
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    /// Euclidean magnitude `sqrt(x² + y² + z²)`
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
