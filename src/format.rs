use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

const BYTE_UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// Render a byte count the way the gallery displays file sizes: `"512 B"`,
/// `"1.5 KB"`, `"12 MB"`. Values below 10 in the scaled unit keep one
/// decimal place, larger ones are rounded to whole numbers. Non-finite
/// input renders as the empty string.
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() {
        return String::new();
    }
    if bytes < 1024.0 {
        return format!("{} B", bytes);
    }

    let mut value = bytes / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let decimals = if value < 10.0 { 1 } else { 0 };
    format!("{:.*} {}", decimals, value, BYTE_UNITS[unit])
}

/// Render a server-supplied upload time for display. The server is not
/// consistent about what it sends, so this accepts epoch milliseconds as
/// well as the usual string shapes, and falls back to echoing the raw
/// value rather than failing on anything it cannot parse.
pub fn format_timestamp(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(number) => match number.as_i64() {
            Some(0) => String::new(),
            Some(millis) => match DateTime::from_timestamp_millis(millis) {
                Some(time) => format_local(time.with_timezone(&Local)),
                None => number.to_string(),
            },
            None => number.to_string(),
        },
        Value::String(text) => {
            if text.is_empty() {
                return String::new();
            }
            match parse_date_string(text) {
                Some(time) => format_local(time),
                None => text.clone(),
            }
        }
        other => other.to_string(),
    }
}

/// Abbreviated month, day, and clock time in the viewer's time zone,
/// e.g. "Jan 5, 3:45 PM".
pub fn format_local(time: DateTime<Local>) -> String {
    time.format("%b %-d, %-I:%M %p").to_string()
}

fn parse_date_string(text: &str) -> Option<DateTime<Local>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Local));
    }
    if let Ok(time) = DateTime::parse_from_rfc2822(text) {
        return Some(time.with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Local.from_local_datetime(&naive).earliest();
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Local.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest();
    }
    None
}
