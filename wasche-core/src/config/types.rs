//! Configuration type definitions
//!
//! Every tunable of the node, with units carried in the field names.
//! Defaults match a 100 Hz ADXL345 node watching a domestic washer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default node identifier
pub const DEFAULT_NODE_ID: u16 = 0x0001;

/// Default accelerometer sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: u16 = 100;

/// Highest sample rate with a non-zero millisecond sample period
pub const MAX_SAMPLE_RATE_HZ: u16 = 1000;

/// Default analysis window capacity (samples, power of two)
pub const DEFAULT_WINDOW_SIZE: usize = 128;

/// Below this RMS the machine is idle (g)
pub const IDLE_THRESHOLD_G: f32 = 0.1;
/// Lower edge of the washing RMS band (g)
pub const WASHING_MIN_G: f32 = 0.3;
/// Upper edge of the washing RMS band (g)
pub const WASHING_MAX_G: f32 = 0.8;
/// At or above this RMS the drum is spinning (g)
pub const SPINNING_MIN_G: f32 = 1.5;
/// Lower edge of the washing frequency band (Hz)
pub const WASHING_BAND_MIN_HZ: f32 = 2.0;
/// Upper edge of the washing frequency band (Hz)
pub const WASHING_BAND_MAX_HZ: f32 = 4.0;

/// Minimum time between data transmissions (ms)
pub const TRANSMIT_INTERVAL_MS: u32 = 5_000;
/// Minimum time between heartbeats (ms)
pub const HEARTBEAT_INTERVAL_MS: u32 = 30_000;
/// Wait before each recovery probe in the error state (ms)
pub const ERROR_BACKOFF_MS: u32 = 5_000;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sample rate is zero or above [`MAX_SAMPLE_RATE_HZ`]
    InvalidSampleRate,
    /// Thresholds are not ordered idle <= washing_min <= washing_max <= spinning_min
    ThresholdOrder,
    /// Washing frequency band is inverted
    InvalidWashingBand,
    /// A timing interval is zero
    ZeroInterval,
}

/// RMS and frequency thresholds used by the state classifier
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassifierThresholds {
    /// RMS below which the machine is idle (g)
    pub idle_g: f32,
    /// Washing RMS band lower edge, inclusive (g)
    pub washing_min_g: f32,
    /// Washing RMS band upper edge, inclusive (g)
    pub washing_max_g: f32,
    /// RMS at or above which the drum is spinning (g)
    pub spinning_min_g: f32,
    /// Washing frequency band lower edge, inclusive (Hz)
    pub washing_band_min_hz: f32,
    /// Washing frequency band upper edge, inclusive (Hz)
    pub washing_band_max_hz: f32,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            idle_g: IDLE_THRESHOLD_G,
            washing_min_g: WASHING_MIN_G,
            washing_max_g: WASHING_MAX_G,
            spinning_min_g: SPINNING_MIN_G,
            washing_band_min_hz: WASHING_BAND_MIN_HZ,
            washing_band_max_hz: WASHING_BAND_MAX_HZ,
        }
    }
}

impl ClassifierThresholds {
    /// Check threshold ordering
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written as negated `<=` so NaN fails too
        let ordered = self.idle_g <= self.washing_min_g
            && self.washing_min_g <= self.washing_max_g
            && self.washing_max_g <= self.spinning_min_g;
        if !ordered {
            return Err(ConfigError::ThresholdOrder);
        }

        if !(self.washing_band_min_hz <= self.washing_band_max_hz) {
            return Err(ConfigError::InvalidWashingBand);
        }

        Ok(())
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeConfig {
    /// Identifier carried in every packet
    pub node_id: u16,
    /// Accelerometer sample rate (Hz)
    pub sample_rate_hz: u16,
    /// Classifier thresholds
    pub thresholds: ClassifierThresholds,
    /// Minimum time between data transmissions (ms)
    pub transmit_interval_ms: u32,
    /// Minimum time between heartbeats (ms)
    pub heartbeat_interval_ms: u32,
    /// Wait before each recovery probe (ms)
    pub error_backoff_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: DEFAULT_NODE_ID,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            thresholds: ClassifierThresholds::default(),
            transmit_interval_ms: TRANSMIT_INTERVAL_MS,
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
            error_backoff_ms: ERROR_BACKOFF_MS,
        }
    }
}

impl NodeConfig {
    /// Time between samples (ms)
    ///
    /// Integer division, as the sampling loop only delays in whole
    /// milliseconds (100 Hz gives 10 ms).
    pub fn sample_period_ms(&self) -> u32 {
        1000 / (self.sample_rate_hz.max(1) as u32)
    }

    /// Width of one spectral bin for a window of `window_size` samples (Hz)
    pub fn bin_resolution_hz(&self, window_size: usize) -> f32 {
        self.sample_rate_hz as f32 / window_size as f32
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 || self.sample_rate_hz > MAX_SAMPLE_RATE_HZ {
            return Err(ConfigError::InvalidSampleRate);
        }

        self.thresholds.validate()?;

        if self.transmit_interval_ms == 0
            || self.heartbeat_interval_ms == 0
            || self.error_backoff_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }
}
