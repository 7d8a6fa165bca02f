//! Board-agnostic core logic for Wasche vibration sensor nodes
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sample window, FFT, vibration metrics and state classification
//! - Control-state machine and the cooperative control loop
//! - Hardware abstraction traits (accelerometer, transport, clock)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod control;
pub mod state;
pub mod traits;
