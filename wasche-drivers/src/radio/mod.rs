//! Coordinator link transports

pub mod serial;

pub use serial::SerialRadio;
