//! Unit-aware formatting of raw property values for mediascope.
//!
//! Every value the backend returns is a string. Conversion to human readable units only
//! happens here, at presentation time, and never touches the cached data.
//!
//! All functions are total: a missing or non-numeric value yields an empty string.
//! Used by the property definitions in [crate::core::property] and by the UI.

use crate::core::stream::{PropertyMap, StreamCounts, StreamKind};

const KIB: u64 = 1 << 10;
const MIB: u64 = 1 << 20;
const GIB: u64 = 1 << 30;

const KBPS: u64 = 1_000;
const MBPS: u64 = 1_000_000;

/// Strips trailing fractional zeros and a dangling decimal point.
///
/// Strings without a decimal point are returned unchanged.
///
/// # Examples
/// "1.50" -> "1.5", "2.000" -> "2", "100" -> "100"
pub fn trim_fraction_zeros(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    let trimmed = value.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

/// Parses the leading run of ASCII digits of a value.
///
/// "1500" -> 1500, "5000.000" -> 5000, "abc" -> None.
/// Leading whitespace is skipped, signs are not accepted.
pub fn parse_leading_int(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().ok()
}

/// Parses the longest leading decimal number of a value, like a lenient float parser would.
///
/// "23.976 (24000/1001)" -> 23.976, "-1.5x" -> -1.5, "x" -> None.
pub fn parse_leading_float(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let bytes = value.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }
    value[..end].parse().ok()
}

fn scaled(value: u64, unit: u64, decimals: usize) -> String {
    trim_fraction_zeros(&format!("{:.*}", decimals, value as f64 / unit as f64))
}

/// Formats a byte count, e.g. "1536" -> "1.5KB".
pub fn format_size(value: Option<&str>) -> String {
    let Some(size) = value.and_then(parse_leading_int) else {
        return String::new();
    };
    if size >= GIB {
        format!("{}GB", scaled(size, GIB, 2))
    } else if size >= MIB {
        format!("{}MB", scaled(size, MIB, 2))
    } else if size >= KIB {
        format!("{}KB", scaled(size, KIB, 2))
    } else {
        format!("{}B", size)
    }
}

/// Formats a bit rate in bits per second, e.g. "1500000" -> "1.5Mbps".
pub fn format_bit_rate(value: Option<&str>) -> String {
    let Some(rate) = value.and_then(parse_leading_int) else {
        return String::new();
    };
    if rate >= MBPS {
        format!("{}Mbps", scaled(rate, MBPS, 2))
    } else if rate >= KBPS {
        format!("{}Kbps", scaled(rate, KBPS, 2))
    } else {
        format!("{}bps", rate)
    }
}

/// Formats a sampling rate in Hz as kHz, e.g. "44100" -> "44.1kHz".
pub fn format_sampling_rate(value: Option<&str>) -> String {
    match value.and_then(parse_leading_int) {
        Some(rate) => format!("{}kHz", scaled(rate, 1000, 3)),
        None => String::new(),
    }
}

/// Formats a duration in milliseconds as decimal seconds without a unit.
pub fn format_duration(value: Option<&str>) -> String {
    match value.and_then(parse_leading_int) {
        Some(ms) => scaled(ms, 1000, 3),
        None => String::new(),
    }
}

/// Frame rates only lose their trailing zeros.
pub fn format_fps(value: Option<&str>) -> String {
    match value {
        Some(v) if parse_leading_float(v).is_some() => trim_fraction_zeros(v.trim()),
        _ => String::new(),
    }
}

pub fn format_default(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Formats milliseconds as `HH:MM:SS.mmm`, prefixed by `{days}d ` when at least a day long.
///
/// Days are never folded further, 400 days stay `400d`.
pub fn format_time_ms(duration: u64) -> String {
    let total_seconds = duration / 1000;
    let total_minutes = total_seconds / 60;
    let total_hours = total_minutes / 60;
    let days = total_hours / 24;

    let time = format!(
        "{:02}:{:02}:{:02}.{:03}",
        total_hours % 24,
        total_minutes % 60,
        total_seconds % 60,
        duration % 1000
    );
    if days > 0 {
        format!("{}d {}", days, time)
    } else {
        time
    }
}

/// Derives the play time column from the `Duration` (or `General:Duration`) of a row.
pub fn format_time(row: &PropertyMap) -> String {
    row.get("Duration")
        .or_else(|| row.get("General:Duration"))
        .and_then(|v| parse_leading_int(v))
        .map(format_time_ms)
        .unwrap_or_default()
}

/// Derives `WxH` from the Width/Height pair of a row.
///
/// Checks the plain keys first (card rows) and the `Video:` prefixed keys after (grid rows).
pub fn format_resolution(row: &PropertyMap) -> String {
    let pair = |w: &str, h: &str| match (row.get(w), row.get(h)) {
        (Some(w), Some(h)) if !w.is_empty() && !h.is_empty() => Some(format!("{}x{}", w, h)),
        _ => None,
    };
    pair("Width", "Height")
        .or_else(|| pair("Video:Width", "Video:Height"))
        .unwrap_or_default()
}

/// Summarises the non-empty stream kinds of a file, e.g. "Video: 1, Audio: 2".
pub fn format_stream_count(counts: &StreamCounts) -> String {
    StreamKind::ALL
        .iter()
        .filter_map(|kind| {
            let count = counts.count(*kind);
            (count > 0).then(|| format!("{}: {}", kind.name(), count))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shortens a long file name to its tail, keeping `max_len` characters including the "..." prefix.
pub fn shrink_file_name(name: &str, max_len: usize) -> String {
    let len = name.chars().count();
    if len <= max_len {
        return name.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = name.chars().skip(len - keep).collect();
    format!("...{}", tail)
}
