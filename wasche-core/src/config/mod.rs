//! Configuration types
//!
//! Board-agnostic node configuration. The firmware fills it in from
//! constants generated at build time.

pub mod types;

pub use types::*;
