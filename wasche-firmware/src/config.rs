//! Node configuration
//!
//! Values come from node.toml, baked in by build.rs.

use defmt::*;
use wasche_core::config::{ClassifierThresholds, NodeConfig};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/node_config.rs"));
}

/// Configuration as written in node.toml
pub fn built_config() -> NodeConfig {
    NodeConfig {
        node_id: generated::NODE_ID,
        sample_rate_hz: generated::SAMPLE_RATE_HZ,
        thresholds: ClassifierThresholds {
            idle_g: generated::IDLE_G,
            washing_min_g: generated::WASHING_MIN_G,
            washing_max_g: generated::WASHING_MAX_G,
            spinning_min_g: generated::SPINNING_MIN_G,
            washing_band_min_hz: generated::WASHING_BAND_MIN_HZ,
            washing_band_max_hz: generated::WASHING_BAND_MAX_HZ,
        },
        transmit_interval_ms: generated::TRANSMIT_INTERVAL_MS,
        heartbeat_interval_ms: generated::HEARTBEAT_INTERVAL_MS,
        error_backoff_ms: generated::ERROR_BACKOFF_MS,
    }
}

/// Load the node configuration, falling back to defaults if it is invalid
pub fn load() -> NodeConfig {
    let config = built_config();
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            error!("node.toml rejected ({:?}), using defaults", e);
            NodeConfig::default()
        }
    }
}
