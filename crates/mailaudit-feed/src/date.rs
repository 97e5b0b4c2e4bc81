//! Date literals used by the monitor properties.
//!
//! Property dates carry minute precision and no zone designator, e.g.
//! `2016-10-30 14:59`. They are always UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// `strftime` layout of `beginDate` / `endDate` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats an instant as a property date, normalized to UTC.
#[must_use]
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    date.with_timezone(&Utc).format(DATE_FORMAT).to_string()
}

/// Parses a property date. Returns `None` unless the value is exactly
/// `YYYY-MM-DD HH:MM` with zero-padded fields.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if !has_date_shape(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Checks the fixed-width layout that `%Y-%m-%d %H:%M` alone would accept
/// loosely (unpadded fields, surrounding spaces).
fn has_date_shape(value: &str) -> bool {
    const SHAPE: &[u8; 16] = b"dddd-dd-dd dd:dd";

    value.len() == SHAPE.len()
        && value
            .bytes()
            .zip(SHAPE)
            .all(|(byte, &expected)| match expected {
                b'd' => byte.is_ascii_digit(),
                _ => byte == expected,
            })
}

/// Parses the Atom `<updated>` timestamp (RFC 3339).
#[must_use]
pub fn parse_updated(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[test]
    fn test_format_normalizes_to_utc() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let end = jst.with_ymd_and_hms(2016, 10, 30, 23, 59, 59).unwrap();
        assert_eq!(format_date(&end), "2016-10-30 14:59");
    }

    #[test]
    fn test_format_drops_seconds() {
        let date = Utc.with_ymd_and_hms(2009, 6, 15, 0, 0, 59).unwrap();
        assert_eq!(format_date(&date), "2009-06-15 00:00");
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2016-08-31 15:00").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2016, 8, 31, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_other_layouts() {
        assert!(parse_date("").is_none());
        assert!(parse_date("2016-08-31").is_none());
        assert!(parse_date("2016-08-31T15:00:00Z").is_none());
        assert!(parse_date("2016-13-31 15:00").is_none());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_parse_date_requires_padded_fields() {
        assert!(parse_date("2016-1-2 3:04").is_none());
        assert!(parse_date("2016-01-02 3:04").is_none());
        assert!(parse_date(" 2016-01-02 03:04").is_none());
        assert!(parse_date("2016-01-02 03:04 ").is_none());
        assert!(parse_date("2016-01-02  03:4").is_none());
        assert_eq!(
            parse_date("2016-01-02 03:04"),
            Some(Utc.with_ymd_and_hms(2016, 1, 2, 3, 4, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_updated() {
        let updated = parse_updated("2009-08-20T00:28:57.319Z").unwrap();
        assert_eq!(
            updated.with_nanosecond(0).unwrap(),
            Utc.with_ymd_and_hms(2009, 8, 20, 0, 28, 57).unwrap()
        );
        assert_eq!(updated.nanosecond(), 319_000_000);
        assert!(parse_updated("2009-08-20 00:28").is_none());
    }
}
