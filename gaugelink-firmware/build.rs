//! Build script for gaugelink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates dashboard.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sections every dashboard.toml must contain
const REQUIRED_SECTIONS: [&str; 6] = ["link", "gauge", "battery", "tick", "radio", "display"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate dashboard.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=dashboard.toml");

    let config_path = Path::new("dashboard.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: dashboard.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds dashboard.toml at build time.               ║\n\
            ║  Please create one in the gaugelink-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read dashboard.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in dashboard.toml                    ║\n\
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
    validate_required_sections(&config, &mut errors);
    validate_link(&config, &mut errors);
    validate_gauge(&config, &mut errors);
    validate_battery(&config, &mut errors);
    validate_tick_and_radio(&config, &mut errors);
    validate_display(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid dashboard configuration                          ║\n\
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

    println!("cargo:warning=dashboard.toml validated successfully");
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

fn validate_required_sections(config: &toml::Value, errors: &mut Vec<String>) {
    for section in REQUIRED_SECTIONS {
        match config.get(section) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => errors.push(format!("Missing [{}] section", section)),
        }
    }
}

/// Integer value of `section.key`, recording an error if missing or out of range
fn int_in_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Float value of `section.key`; integers are accepted
fn float_value(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<f64> {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Float(v)) => Some(*v),
        Some(toml::Value::Integer(v)) => Some(*v as f64),
        Some(_) => {
            errors.push(format!("[{}] {} must be a number", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    int_in_range(config, "link", "timeout_ms", 1, 60_000, errors);
    int_in_range(config, "link", "connected_color", 0, 0xFF_FFFF, errors);
    int_in_range(config, "link", "disconnected_color", 0, 0xFF_FFFF, errors);
}

fn validate_gauge(config: &toml::Value, errors: &mut Vec<String>) {
    int_in_range(config, "gauge", "rpm_per_unit", 1, 65_535, errors);
    let max_speed = int_in_range(config, "gauge", "max_speed", 1, 65_535, errors);

    let thresholds = match config.get("gauge").and_then(|g| g.get("ride_mode_thresholds")) {
        Some(toml::Value::Array(items)) => items.iter().map(|v| v.as_integer()).collect::<Option<Vec<_>>>(),
        Some(_) => None,
        None => {
            errors.push("[gauge] missing 'ride_mode_thresholds'".to_string());
            return;
        }
    };

    match thresholds {
        Some(t) if t.len() == 3 => {
            if !(t[0] < t[1] && t[1] < t[2]) {
                errors.push("[gauge] ride_mode_thresholds must be strictly increasing".to_string());
            }
            if t[0] < 0 || max_speed.is_some_and(|max| t[2] > max) {
                errors.push("[gauge] ride_mode_thresholds must lie within 0..=max_speed".to_string());
            }
        }
        _ => errors.push("[gauge] ride_mode_thresholds must be 3 integers".to_string()),
    }
}

fn validate_battery(config: &toml::Value, errors: &mut Vec<String>) {
    let empty = float_value(config, "battery", "empty_volts", errors);
    let full = float_value(config, "battery", "full_volts", errors);
    if let (Some(empty), Some(full)) = (empty, full) {
        if !(empty < full) {
            errors.push("[battery] empty_volts must be below full_volts".to_string());
        }
    }
    int_in_range(config, "battery", "range_max", 0, 255, errors);
}

fn validate_tick_and_radio(config: &toml::Value, errors: &mut Vec<String>) {
    int_in_range(config, "tick", "interval_ms", 1, 1000, errors);
    int_in_range(config, "radio", "baud", 9600, 3_000_000, errors);
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    int_in_range(config, "display", "rotation", 0, 3, errors);
    int_in_range(config, "display", "x_offset", 0, 320, errors);
    int_in_range(config, "display", "y_offset", 0, 320, errors);
    if let Some(invert) = config.get("display").and_then(|d| d.get("invert")) {
        if !invert.is_bool() {
            errors.push("[display] invert must be true or false".to_string());
        }
    }
}
