//! Control loop
//!
//! A single cooperative loop owns the sample window, the latest result and
//! the control state. It suspends only in the sample-period delay and the
//! error backoff.

pub mod node;

pub use node::{NodeController, StepReport};
