//! Events that trigger control-state transitions

use crate::traits::SensorError;

/// Collaborator that failed bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Accelerometer did not initialise
    Sensor,
    /// Transport did not come up
    Transport,
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Sensor and transport both came up
    BootComplete,
    /// A collaborator failed to come up
    BootFailed(Fault),

    // Sampling events
    /// Sample stored, window not yet full
    SampleStored,
    /// Sensor read failed; nothing was stored
    SampleFailed(SensorError),
    /// Window full and a fresh result was produced
    WindowAnalyzed,

    // Reporting events
    /// A result is waiting to be transmitted
    ResultReady,
    /// Transmit and heartbeat checks are done for this cycle
    TransmitCycleDone,

    // Recovery events
    /// Sensor and transport both answered the probe
    Recovered,
    /// At least one collaborator is still unreachable
    RecoveryFailed,
}
