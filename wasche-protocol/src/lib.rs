//! Node-to-coordinator packet protocol
//!
//! This crate defines the fixed-size binary record a sensor node sends to
//! the network coordinator through its serial radio modem, and the parser
//! the coordinator side uses to pick records out of the byte stream.
//!
//! # Packet Overview
//!
//! Every packet is the same 18-byte packed, little-endian record:
//! ```text
//! ┌──────┬─────────┬───────┬──────┬──────┬───────────┬──────────┐
//! │ TYPE │ NODE_ID │ STATE │ RMS  │ FREQ │ TIMESTAMP │ CHECKSUM │
//! │ 1B   │ 2B      │ 1B    │ 4B   │ 4B   │ 4B        │ 2B       │
//! └──────┴─────────┴───────┴──────┴──────┴───────────┴──────────┘
//! ```
//!
//! Heartbeat and ack packets reuse the layout with the measurement fields
//! zeroed.

#![no_std]
#![deny(unsafe_code)]

pub mod packet;
pub mod parser;

pub use packet::{checksum, Packet, PacketError, PacketType, PACKET_SIZE};
pub use parser::PacketParser;
