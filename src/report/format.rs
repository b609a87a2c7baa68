//! Formatting helpers for the text report.
//!
//! Byte sizes use binary units (base 1024) with a floor-log unit choice:
//! values below 1024 render as integer bytes, everything else as the
//! value divided by `1024^unit` with one decimal, trailing `.0` trimmed.
//! `parse_bytes` inverts the format within unit rounding.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Render a byte count with binary units.
///
/// `0` renders as `"0 B"`; negative inputs are treated as zero.
pub fn format_bytes(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 B".to_string();
    }
    let mut unit = 0usize;
    let mut scale = 1i64;
    while unit + 1 < UNITS.len() && bytes >= scale * 1024 {
        unit += 1;
        scale *= 1024;
    }
    if unit == 0 {
        return format!("{bytes} B");
    }

    let value = bytes as f64 / scale as f64;
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0} {}", UNITS[unit])
    } else {
        format!("{rounded:.1} {}", UNITS[unit])
    }
}

/// Parse a string produced by [`format_bytes`] back into bytes.
pub fn parse_bytes(text: &str) -> Option<f64> {
    let mut parts = text.split_whitespace();
    let value: f64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let exponent = UNITS.iter().position(|u| *u == unit)?;
    Some(value * 1024f64.powi(exponent as i32))
}

/// Render a duration in seconds with an adaptive unit.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.1}s")
    } else if seconds < 3_600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else if seconds < 86_400.0 {
        format!("{:.1}h", seconds / 3_600.0)
    } else {
        format!("{:.1}d", seconds / 86_400.0)
    }
}

/// Render a percentage with one decimal.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_canonical_values() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_073_741_824), "1 GB");
    }

    #[test]
    fn test_format_bytes_negative_clamps_to_zero() {
        assert_eq!(format_bytes(-10), "0 B");
    }

    #[test]
    fn test_format_bytes_large_values_cap_at_tb() {
        assert_eq!(format_bytes(1024i64.pow(4)), "1 TB");
        assert_eq!(format_bytes(2 * 1024i64.pow(4) + 1024i64.pow(4) / 2), "2.5 TB");
    }

    #[test]
    fn test_parse_bytes_round_trip() {
        for &bytes in &[0i64, 1023, 1024, 1536, 1_073_741_824] {
            let formatted = format_bytes(bytes);
            let parsed = parse_bytes(&formatted).unwrap();
            // exact up to the one-decimal rounding applied per unit
            let unit_scale = (parsed.max(1.0)).log(1024.0).floor();
            let tolerance = 0.05 * 1024f64.powf(unit_scale) + 1e-9;
            assert!(
                (parsed - bytes as f64).abs() <= tolerance,
                "{bytes} -> {formatted} -> {parsed}"
            );
        }
    }

    #[test]
    fn test_parse_bytes_rejects_garbage() {
        assert_eq!(parse_bytes("fast"), None);
        assert_eq!(parse_bytes("1.5 XB"), None);
        assert_eq!(parse_bytes("1 KB extra"), None);
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(0.5), "0.5s");
        assert_eq!(format_duration(59.9), "59.9s");
        assert_eq!(format_duration(90.0), "1.5m");
        assert_eq!(format_duration(5_400.0), "1.5h");
        assert_eq!(format_duration(129_600.0), "1.5d");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(95.0), "95.0%");
        assert_eq!(format_percent(33.333), "33.3%");
    }
}
