//! Control-state machine
//!
//! Exactly one control state is active at a time, and it changes only at
//! well-defined points between operations.

pub mod events;
pub mod machine;

pub use events::{Event, Fault};
pub use machine::ControlState;
