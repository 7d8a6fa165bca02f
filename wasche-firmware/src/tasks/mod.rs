//! Embassy async tasks
//!
//! The node task is the only writer of control-loop state. The receive
//! task shares nothing with it.

pub mod node;
pub mod radio_rx;

pub use node::{node_task, Radio, Sensor};
pub use radio_rx::radio_rx_task;
