//! Accelerometer trait

use crate::analysis::RawSample;

/// Errors that can occur while talking to the accelerometer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, timeout)
    Bus,
    /// Device answered with the wrong identity
    UnexpectedDeviceId(u8),
    /// Device has not been configured for measurement
    NotReady,
}

/// Trait for 3-axis accelerometers
///
/// Reads are expected to return within a bounded time or fail.
pub trait Accelerometer {
    /// Verify the device and configure it for measurement
    fn init(&mut self) -> Result<(), SensorError>;

    /// Read one raw sample in device counts
    fn read_sample(&mut self) -> Result<RawSample, SensorError>;

    /// Check that the device is present and responding
    fn test_connection(&mut self) -> bool;
}
