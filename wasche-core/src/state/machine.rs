//! Control-state machine definition
//!
//! Sequencing of the control loop is a pure function of the current state
//! and an event. The loop decides which event happened; this table decides
//! where that leads.

use super::events::Event;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Control loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControlState {
    /// Bringing up the sensor and transport
    #[default]
    Init,
    /// Collecting one sample per sample period
    Sampling,
    /// A fresh result exists
    Analyzing,
    /// Checking transmit and heartbeat intervals
    Transmitting,
    /// Backing off, then probing collaborators
    Error,
}

impl ControlState {
    /// Decode a raw state value
    ///
    /// Unrecognised values decode to [`ControlState::Error`].
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ControlState::Init,
            1 => ControlState::Sampling,
            2 => ControlState::Analyzing,
            3 => ControlState::Transmitting,
            _ => ControlState::Error,
        }
    }

    /// Raw state value
    pub fn as_raw(self) -> u8 {
        match self {
            ControlState::Init => 0,
            ControlState::Sampling => 1,
            ControlState::Analyzing => 2,
            ControlState::Transmitting => 3,
            ControlState::Error => 4,
        }
    }

    /// Check if this is the error state
    pub fn is_error(&self) -> bool {
        matches!(self, ControlState::Error)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use ControlState::*;
        use Event::*;

        match (self, event) {
            // Init transitions
            (Init, BootComplete) => Sampling,
            (Init, BootFailed(_)) => Error,

            // Sampling transitions; a failed read is not fatal
            (Sampling, SampleStored) => Sampling,
            (Sampling, SampleFailed(_)) => Sampling,
            (Sampling, WindowAnalyzed) => Analyzing,

            // Analyzing transitions
            (Analyzing, ResultReady) => Transmitting,

            // Transmitting transitions
            (Transmitting, TransmitCycleDone) => Sampling,

            // Error transitions
            (Error, Recovered) => Sampling,
            (Error, RecoveryFailed) => Error,

            // Anything else is a sequencing bug
            _ => Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Fault;
    use crate::traits::SensorError;

    #[test]
    fn test_boot_transitions() {
        assert_eq!(
            ControlState::Init.transition(Event::BootComplete),
            ControlState::Sampling
        );
        assert_eq!(
            ControlState::Init.transition(Event::BootFailed(Fault::Transport)),
            ControlState::Error
        );
    }

    #[test]
    fn test_full_cycle() {
        let mut state = ControlState::Init;
        for event in [
            Event::BootComplete,
            Event::SampleStored,
            Event::WindowAnalyzed,
            Event::ResultReady,
            Event::TransmitCycleDone,
        ] {
            state = state.transition(event);
        }
        assert_eq!(state, ControlState::Sampling);
    }

    #[test]
    fn test_read_failure_stays_sampling() {
        let state = ControlState::Sampling.transition(Event::SampleFailed(SensorError::Bus));
        assert_eq!(state, ControlState::Sampling);
    }

    #[test]
    fn test_error_recovery() {
        assert_eq!(
            ControlState::Error.transition(Event::RecoveryFailed),
            ControlState::Error
        );
        assert_eq!(
            ControlState::Error.transition(Event::Recovered),
            ControlState::Sampling
        );
    }

    #[test]
    fn test_unexpected_event_goes_to_error() {
        assert_eq!(
            ControlState::Analyzing.transition(Event::SampleStored),
            ControlState::Error
        );
        assert_eq!(
            ControlState::Init.transition(Event::Recovered),
            ControlState::Error
        );
        assert_eq!(
            ControlState::Transmitting.transition(Event::WindowAnalyzed),
            ControlState::Error
        );
    }

    #[test]
    fn test_raw_decoding() {
        for state in [
            ControlState::Init,
            ControlState::Sampling,
            ControlState::Analyzing,
            ControlState::Transmitting,
            ControlState::Error,
        ] {
            assert_eq!(ControlState::from_raw(state.as_raw()), state);
        }
        assert_eq!(ControlState::from_raw(99), ControlState::Error);
    }
}
