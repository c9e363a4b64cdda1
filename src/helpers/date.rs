//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, TimeZone};

/// Locale used for every rendered date
pub const DATE_LOCALE: Locale = Locale::pt_BR;

/// Format a date using a Moment.js-compatible format string in [`DATE_LOCALE`]
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY") // -> "15 mar 2021"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // Convert Moment.js format to chrono format
    let chrono_format = moment_to_chrono_format(format);
    date.format_localized(&chrono_format, DATE_LOCALE)
        .to_string()
}

/// Format an optional date, rendering an absent one as empty text
pub fn format_optional_date(date: Option<&DateTime<FixedOffset>>, format: &str) -> String {
    date.map(|d| format_date(d, format)).unwrap_or_default()
}

/// Parse a publication timestamp as sent by the content repository
///
/// Accepts RFC 3339 as well as the `+0000` offset style
/// (`2021-03-15T19:25:28+0000`). Anything else yields `None`.
pub fn parse_publication_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    let parsed = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"));

    match parsed {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("Ignoring unparsable publication date {:?}: {}", s, e);
            None
        }
    }
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Process from longest to shortest patterns within each category
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"), // Full month name
        ("MMM", "%b"),  // Abbreviated month name
        ("MM", "%m"),   // Two-digit month
        // Day of month
        ("DD", "%d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute (after MM)
        ("mm", "%M"),
        // Second
        ("ss", "%S"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
