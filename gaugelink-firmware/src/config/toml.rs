//! Simple TOML parser for the dashboard configuration
//!
//! This is a minimal TOML parser that handles only the subset used by
//! dashboard.toml. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (integer, hex integer, float, boolean)
//! - [section] headers
//! - Single-line integer arrays: ride_mode_thresholds = [60, 80, 140]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Strings, multi-line values, inline tables
//! - Dotted section headers or keys

use gaugelink_core::traits::Color;

use super::FirmwareConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    InvalidKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Gauge,
    Battery,
    Tick,
    Radio,
    Display,
}

/// Parse TOML configuration into FirmwareConfig
///
/// Keys not present keep their default values. The result is checked with
/// `DashboardConfig::validate`.
pub fn parse_config(input: &str) -> Result<FirmwareConfig, ParseError> {
    let mut config = FirmwareConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    config
        .dashboard
        .validate()
        .map_err(|_| ParseError::InvalidValue)?;
    if config.tick.interval_ms == 0 || config.radio.baud == 0 || config.display.rotation > 3 {
        return Err(ParseError::InvalidValue);
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "link" => Ok(Section::Link),
        "gauge" => Ok(Section::Gauge),
        "battery" => Ok(Section::Battery),
        "tick" => Ok(Section::Tick),
        "radio" => Ok(Section::Radio),
        "display" => Ok(Section::Display),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) => value[..hash_pos].trim(),
        None => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an integer value, decimal or `0x` hex
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseError> {
    let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    let digits = strip_separators(digits)?;
    let raw = u64::from_str_radix(&digits, radix).map_err(|_| ParseError::InvalidValue)?;
    T::try_from(raw).map_err(|_| ParseError::InvalidValue)
}

/// Copy of `digits` without TOML `_` separators
fn strip_separators(digits: &str) -> Result<heapless::String<24>, ParseError> {
    let mut out = heapless::String::new();
    for c in digits.chars().filter(|&c| c != '_') {
        out.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    Ok(out)
}

/// Parse a float value; integers are accepted
fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a `0xRRGGBB` color
fn parse_color(value: &str) -> Result<Color, ParseError> {
    let hex: u32 = parse_int(value)?;
    if hex > 0xFF_FFFF {
        return Err(ParseError::InvalidValue);
    }
    Ok(Color::from_hex(hex))
}

/// Parse a three-entry integer array like "[60, 80, 140]"
fn parse_thresholds(value: &str) -> Result<[u16; 3], ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut out = [0u16; 3];
    let mut count = 0;
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let slot = out.get_mut(count).ok_or(ParseError::InvalidValue)?;
        *slot = parse_int(item)?;
        count += 1;
    }
    if count != out.len() {
        return Err(ParseError::InvalidValue);
    }
    Ok(out)
}

fn apply_value(
    config: &mut FirmwareConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    let dashboard = &mut config.dashboard;
    match (section, key) {
        (Section::Link, "timeout_ms") => dashboard.link.timeout_ms = parse_int(value)?,
        (Section::Link, "connected_color") => dashboard.link.connected_color = parse_color(value)?,
        (Section::Link, "disconnected_color") => {
            dashboard.link.disconnected_color = parse_color(value)?
        }

        (Section::Gauge, "rpm_per_unit") => dashboard.gauge.rpm_per_unit = parse_int(value)?,
        (Section::Gauge, "max_speed") => dashboard.gauge.max_speed = parse_int(value)?,
        (Section::Gauge, "ride_mode_thresholds") => {
            dashboard.gauge.ride_mode_thresholds = parse_thresholds(value)?
        }

        (Section::Battery, "empty_volts") => dashboard.battery.empty_volts = parse_float(value)?,
        (Section::Battery, "full_volts") => dashboard.battery.full_volts = parse_float(value)?,
        (Section::Battery, "range_max") => dashboard.battery.range_max = parse_int(value)?,

        (Section::Tick, "interval_ms") => config.tick.interval_ms = parse_int(value)?,

        (Section::Radio, "baud") => config.radio.baud = parse_int(value)?,

        (Section::Display, "rotation") => config.display.rotation = parse_int(value)?,
        (Section::Display, "x_offset") => config.display.x_offset = parse_int(value)?,
        (Section::Display, "y_offset") => config.display.y_offset = parse_int(value)?,
        (Section::Display, "invert") => config.display.invert = parse_bool(value)?,

        (Section::Root, _) => return Err(ParseError::InvalidSection),
        _ => return Err(ParseError::InvalidKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaugelink_core::config::DashboardConfig;

    const EMBEDDED: &str = include_str!("../../dashboard.toml");

    #[test]
    fn test_parse_embedded_config() {
        let config = parse_config(EMBEDDED).unwrap();
        assert_eq!(config.dashboard, DashboardConfig::default());
        assert_eq!(config.tick.interval_ms, 5);
        assert_eq!(config.radio.baud, 115_200);
        assert_eq!(config.display.rotation, 3);
        assert_eq!(config.display.y_offset, 35);
        assert!(config.display.invert);
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("link"), Ok(Section::Link));
        assert_eq!(parse_section_header(" display "), Ok(Section::Display));
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int::<u32>("1000"), Ok(1000));
        assert_eq!(parse_int::<u32>("115_200"), Ok(115_200));
        assert_eq!(parse_int::<u32>("0x00FF00"), Ok(0x00FF00));
        assert_eq!(parse_int::<u8>("256"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u16>("-1"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u16>("ten"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_thresholds() {
        assert_eq!(parse_thresholds("[60, 80, 140]"), Ok([60, 80, 140]));
        assert_eq!(parse_thresholds("[ 10,20,30 ]"), Ok([10, 20, 30]));
        assert_eq!(parse_thresholds("[60, 80]"), Err(ParseError::InvalidValue));
        assert_eq!(parse_thresholds("[60, 80, 140, 200]"), Err(ParseError::InvalidValue));
        assert_eq!(parse_thresholds("60, 80, 140"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
[link]
timeout_ms = 1500 # slower sender

[battery]
empty_volts = 42
full_volts = 54.6
"#,
        )
        .unwrap();

        assert_eq!(config.dashboard.link.timeout_ms, 1500);
        assert_eq!(config.dashboard.battery.empty_volts, 42.0);
        assert_eq!(config.dashboard.battery.full_volts, 54.6);
        assert_eq!(config.dashboard.gauge.rpm_per_unit, 32);
        assert_eq!(config.tick.interval_ms, 5);
    }

    #[test]
    fn test_rejects_unknown_key() {
        let result = parse_config("[gauge]\nrpm_per_mile = 3\n");
        assert_eq!(result, Err(ParseError::InvalidKey));
    }

    #[test]
    fn test_rejects_key_outside_section() {
        assert_eq!(parse_config("timeout_ms = 5\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert_eq!(
            parse_config("[display]\ninvert = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[link]\nconnected_color = 0x1000000\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[radio]\nbaud\n"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_rejects_invalid_dashboard() {
        assert_eq!(
            parse_config("[gauge]\nride_mode_thresholds = [80, 60, 140]\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[battery]\nempty_volts = 15.0\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[tick]\ninterval_ms = 0\n"),
            Err(ParseError::InvalidValue)
        );
    }
}
