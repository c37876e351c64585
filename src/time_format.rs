//! Human-readable durations for hint descriptions and text output

const UNIT_MILLISECONDS: &str = "ms";
const UNIT_SECONDS: &str = "s";

/// Times below this many milliseconds are shown in milliseconds by [`format_time`]
pub const MAX_MILLISECONDS: f64 = 2000.0;

/// Whole milliseconds, truncated toward zero: `1234.9` → `"1234ms"`
pub fn format_milliseconds(time: f64) -> String {
    format!("{}{}", time.trunc() as i64, UNIT_MILLISECONDS)
}

/// Seconds with a fixed number of decimal places: `(2500.0, 2)` → `"2.50s"`
pub fn format_seconds(time: f64, decimal_places: usize) -> String {
    format!("{:.*}{}", decimal_places, time / 1000.0, UNIT_SECONDS)
}

/// Milliseconds below two seconds, seconds with two decimals otherwise
pub fn format_time(time: f64) -> String {
    if time < MAX_MILLISECONDS {
        format_milliseconds(time)
    } else {
        format_seconds(time, 2)
    }
}
