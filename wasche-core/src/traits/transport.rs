//! Transport trait

use crate::analysis::VibrationResult;

/// Errors that can occur when sending to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Link is down
    NotConnected,
    /// Underlying write failed
    Io,
}

/// Trait for the link to the coordinator
///
/// Implementations own framing; the control loop only hands over results.
pub trait Transport {
    /// Bring the link up
    fn init(&mut self) -> Result<(), TransportError>;

    /// Send an analysis result
    fn send_result(&mut self, result: &VibrationResult) -> Result<(), TransportError>;

    /// Send a liveness heartbeat stamped with `timestamp_ms`
    fn send_heartbeat(&mut self, timestamp_ms: u32) -> Result<(), TransportError>;

    /// Check whether the link is usable
    ///
    /// Takes `&mut self` because checking may probe the link.
    fn is_connected(&mut self) -> bool;
}
