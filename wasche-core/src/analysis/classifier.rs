//! Machine state classifier
//!
//! Maps (RMS, dominant frequency) to a machine state with ordered threshold
//! rules; the first matching rule wins:
//!
//! 1. `rms < idle` → Idle
//! 2. `rms >= spinning_min` → Spinning
//! 3. `washing_min <= rms <= washing_max` and frequency inside the washing
//!    band → Washing
//! 4. otherwise → Unknown
//!
//! Each call is independent; no history is kept.

use crate::config::ClassifierThresholds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Wire format tags
const TAG_IDLE: u8 = 0;
const TAG_WASHING: u8 = 1;
const TAG_SPINNING: u8 = 2;
const TAG_DONE: u8 = 3;
const TAG_UNKNOWN: u8 = 4;

/// Inferred machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MachineState {
    /// No meaningful vibration
    Idle,
    /// Medium agitation at drum-tumble frequency
    Washing,
    /// High-energy spin cycle
    Spinning,
    /// Cycle finished
    ///
    /// Reserved: no rule produces it yet. Detecting it needs history (high
    /// vibration followed by quiet), which the classifier does not keep.
    Done,
    /// Vibration that matches no rule
    Unknown,
}

impl MachineState {
    /// Parse a state from its wire format tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            TAG_IDLE => Some(MachineState::Idle),
            TAG_WASHING => Some(MachineState::Washing),
            TAG_SPINNING => Some(MachineState::Spinning),
            TAG_DONE => Some(MachineState::Done),
            TAG_UNKNOWN => Some(MachineState::Unknown),
            _ => None,
        }
    }

    /// Convert to wire format tag
    pub fn tag(self) -> u8 {
        match self {
            MachineState::Idle => TAG_IDLE,
            MachineState::Washing => TAG_WASHING,
            MachineState::Spinning => TAG_SPINNING,
            MachineState::Done => TAG_DONE,
            MachineState::Unknown => TAG_UNKNOWN,
        }
    }

    /// Classify a window summary
    pub fn classify(rms: f32, freq: f32, thresholds: &ClassifierThresholds) -> Self {
        if rms < thresholds.idle_g {
            return MachineState::Idle;
        }

        if rms >= thresholds.spinning_min_g {
            return MachineState::Spinning;
        }

        let washing_energy = rms >= thresholds.washing_min_g && rms <= thresholds.washing_max_g;
        let washing_freq =
            freq >= thresholds.washing_band_min_hz && freq <= thresholds.washing_band_max_hz;
        if washing_energy && washing_freq {
            return MachineState::Washing;
        }

        MachineState::Unknown
    }
}
