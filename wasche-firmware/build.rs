//! Build script for wasche-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates node.toml at compile time
//! - Generates `node_config.rs` constants from node.toml

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    let config = validate_config();
    generate_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Node settings read from node.toml
struct NodeToml {
    node_id: u16,
    sample_rate_hz: u16,
    idle_g: f64,
    washing_min_g: f64,
    washing_max_g: f64,
    spinning_min_g: f64,
    washing_band_min_hz: f64,
    washing_band_max_hz: f64,
    transmit_interval_ms: u32,
    heartbeat_interval_ms: u32,
    error_backoff_ms: u32,
}

/// Validate node.toml configuration at compile time
fn validate_config() -> NodeToml {
    // Re-run if node.toml changes
    println!("cargo:rerun-if-changed=node.toml");

    let config_path = Path::new("node.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: node.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a node.toml configuration file.           ║\n\
            ║  Please create one in the wasche-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read node.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in node.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let node = read_node(&config, &mut errors);

    if errors.is_empty() {
        check_ranges(&node, &mut errors);
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid node configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=node.toml validated successfully");
    node
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pull every setting out of the parsed file, collecting what is missing
fn read_node(config: &toml::Value, errors: &mut Vec<String>) -> NodeToml {
    NodeToml {
        node_id: read_int(config, "node", "id", 1, u16::MAX as i64, errors) as u16,
        sample_rate_hz: read_int(config, "sampling", "rate_hz", 1, 1000, errors) as u16,
        idle_g: read_float(config, "thresholds", "idle_g", errors),
        washing_min_g: read_float(config, "thresholds", "washing_min_g", errors),
        washing_max_g: read_float(config, "thresholds", "washing_max_g", errors),
        spinning_min_g: read_float(config, "thresholds", "spinning_min_g", errors),
        washing_band_min_hz: read_float(config, "thresholds", "washing_band_min_hz", errors),
        washing_band_max_hz: read_float(config, "thresholds", "washing_band_max_hz", errors),
        transmit_interval_ms: read_int(config, "timing", "transmit_interval_ms", 1, u32::MAX as i64, errors)
            as u32,
        heartbeat_interval_ms: read_int(config, "timing", "heartbeat_interval_ms", 1, u32::MAX as i64, errors)
            as u32,
        error_backoff_ms: read_int(config, "timing", "error_backoff_ms", 1, u32::MAX as i64, errors) as u32,
    }
}

fn read_int(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            min
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            min
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            min
        }
    }
}

fn read_float(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> f64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Float(v)) if v.is_finite() && *v >= 0.0 => *v,
        Some(toml::Value::Integer(v)) if *v >= 0 => *v as f64,
        Some(_) => {
            errors.push(format!("[{}] {} must be a non-negative number", section, key));
            0.0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0.0
        }
    }
}

/// Cross-field checks
fn check_ranges(node: &NodeToml, errors: &mut Vec<String>) {
    let ordered = node.idle_g <= node.washing_min_g
        && node.washing_min_g <= node.washing_max_g
        && node.washing_max_g <= node.spinning_min_g;
    if !ordered {
        errors.push("[thresholds] must satisfy idle <= washing_min <= washing_max <= spinning_min".into());
    }

    if node.washing_band_min_hz > node.washing_band_max_hz {
        errors.push("[thresholds] washing_band_min_hz above washing_band_max_hz".into());
    }

    let nyquist = node.sample_rate_hz as f64 / 2.0;
    if node.washing_band_max_hz >= nyquist {
        errors.push(format!("[thresholds] washing band must stay below {} Hz", nyquist));
    }
}

/// Write node.toml values out as Rust constants
fn generate_config(out_dir: &Path, node: &NodeToml) {
    let source = format!(
        "// Generated from node.toml by build.rs\n\
         pub const NODE_ID: u16 = {};\n\
         pub const SAMPLE_RATE_HZ: u16 = {};\n\
         pub const IDLE_G: f32 = {:?};\n\
         pub const WASHING_MIN_G: f32 = {:?};\n\
         pub const WASHING_MAX_G: f32 = {:?};\n\
         pub const SPINNING_MIN_G: f32 = {:?};\n\
         pub const WASHING_BAND_MIN_HZ: f32 = {:?};\n\
         pub const WASHING_BAND_MAX_HZ: f32 = {:?};\n\
         pub const TRANSMIT_INTERVAL_MS: u32 = {};\n\
         pub const HEARTBEAT_INTERVAL_MS: u32 = {};\n\
         pub const ERROR_BACKOFF_MS: u32 = {};\n",
        node.node_id,
        node.sample_rate_hz,
        node.idle_g,
        node.washing_min_g,
        node.washing_max_g,
        node.spinning_min_g,
        node.washing_band_min_hz,
        node.washing_band_max_hz,
        node.transmit_interval_ms,
        node.heartbeat_interval_ms,
        node.error_backoff_ms,
    );

    fs::write(out_dir.join("node_config.rs"), source).unwrap();
}
