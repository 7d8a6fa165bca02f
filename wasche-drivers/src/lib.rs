//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in wasche-core:
//!
//! - Accelerometers (ADXL345 over I2C)
//! - Transports (serial radio modem in transparent mode)

#![no_std]
#![deny(unsafe_code)]

pub mod accel;
pub mod radio;
