//! Bilingual post date formatting

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Europe::Paris;
use chrono_tz::Tz;

/// Timezone every human-readable date is shown in
pub const DISPLAY_TIMEZONE: Tz = Paris;

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// The dates shown alongside a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDates {
    /// "March 5, 2024" or "5 mars 2024"
    pub human: String,
    /// "2024-03-05T10:00:00Z", whatever the language
    pub iso: String,
    /// "2024-03-05" in the display timezone
    pub input: String,
}

/// Format a Unix timestamp for a post written in `language`
///
/// Any language other than "en" gets the French format.
pub fn format_date(timestamp: i64, language: &str) -> PostDates {
    let utc = to_utc(timestamp);
    let local = utc.with_timezone(&DISPLAY_TIMEZONE);
    let month = local.month0() as usize;

    let human = if language == "en" {
        format!("{} {}, {}", MONTHS_EN[month], local.day(), local.year())
    } else {
        format!("{} {} {}", local.day(), MONTHS_FR[month], local.year())
    };

    PostDates {
        human,
        iso: utc.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        input: local.format("%Y-%m-%d").to_string(),
    }
}

/// Parse a `YYYY-MM-DD` form date as midnight in the display timezone
pub fn parse_input_date(value: &str) -> Option<i64> {
    let date = chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    midnight
        .and_local_timezone(DISPLAY_TIMEZONE)
        .earliest()
        .map(|dt| dt.timestamp())
}

fn to_utc(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-05T10:00:00Z
    const MARCH_5: i64 = 1_709_632_800;

    #[test]
    fn test_format_date_en() {
        let dates = format_date(MARCH_5, "en");
        assert_eq!(dates.human, "March 5, 2024");
        assert_eq!(dates.iso, "2024-03-05T10:00:00Z");
    }

    #[test]
    fn test_format_date_fr() {
        let dates = format_date(MARCH_5, "fr");
        assert_eq!(dates.human, "5 mars 2024");
        assert_eq!(dates.iso, format_date(MARCH_5, "en").iso);
    }

    #[test]
    fn test_unknown_language_uses_french() {
        assert_eq!(format_date(MARCH_5, "de").human, "5 mars 2024");
        assert_eq!(format_date(MARCH_5, "").human, "5 mars 2024");
    }

    #[test]
    fn test_human_date_uses_paris_time() {
        // 2024-03-05T23:00:00Z is already March 6th in Paris
        let dates = format_date(MARCH_5 + 13 * 3600, "fr");
        assert_eq!(dates.human, "6 mars 2024");
        assert_eq!(dates.iso, "2024-03-05T23:00:00Z");
        assert_eq!(dates.input, "2024-03-06");
    }

    #[test]
    fn test_parse_input_date() {
        // Midnight in Paris, UTC+1 in winter
        assert_eq!(parse_input_date("2024-03-05"), Some(MARCH_5 - 11 * 3600));
        assert_eq!(parse_input_date("not a date"), None);
        assert_eq!(parse_input_date(""), None);
    }
}
