//! Hardware abstraction traits
//!
//! These traits define the interface between the control loop and the
//! sensor, radio and timer implementations it drives.

pub mod clock;
pub mod sensor;
pub mod transport;

pub use clock::Clock;
pub use sensor::{Accelerometer, SensorError};
pub use transport::{Transport, TransportError};
