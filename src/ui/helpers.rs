//! Display formatting shared by the view models.
//!
//! Money and timestamps arrive as the strings the backend sends. These helpers
//! turn them into what the account page shows.

use chrono::{DateTime, NaiveDateTime};

use crate::domain::parse_amount;

const DISPLAY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Shown for identifiers the backend left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a balance to two decimals, `"0.00"` when missing or unparsable.
///
/// # Examples
///
/// ```
/// use bankflow::ui::helpers::format_balance;
///
/// assert_eq!(format_balance("1250.5"), "1250.50");
/// assert_eq!(format_balance(""), "0.00");
/// ```
#[must_use]
pub fn format_balance(raw: &str) -> String {
    format!("{:.2}", parse_amount(raw).unwrap_or(0.0))
}

/// Formats a signed amount as `$` plus its absolute value to two decimals.
#[must_use]
pub fn format_money(value: f64) -> String {
    format!("${:.2}", value.abs())
}

/// Returns `value`, or [`NOT_AVAILABLE`] when it is blank.
#[must_use]
pub fn or_not_available(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Renders a backend timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// Accepts RFC 3339 (kept in its own offset) and naive ISO-8601 with either
/// a `T` or a space separator. Anything else is returned unchanged.
///
/// # Examples
///
/// ```
/// use bankflow::ui::helpers::format_timestamp;
///
/// assert_eq!(format_timestamp("2024-03-02T09:15:00.123456"), "2024-03-02 09:15:00");
/// assert_eq!(format_timestamp("2024-03-02T09:15:00+02:00"), "2024-03-02 09:15:00");
/// assert_eq!(format_timestamp("yesterday"), "yesterday");
/// ```
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY_TIMESTAMP).to_string();
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map_or_else(|| raw.to_string(), |parsed| parsed.format(DISPLAY_TIMESTAMP).to_string())
}
