//! Trade date parsing and canonical formatting.
//!
//! Journals written by older revisions stored dates in several textual forms.
//! Every accepted form is normalized to a [`NaiveDate`]; anything else becomes
//! an unknown date (`None`) rather than an error.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Canonical on-disk date form.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Date-only forms, tried in this order.
const DATE_FORMATS: &[&str] = &[CANONICAL_FORMAT, "%d/%m/%Y", "%d-%m-%Y"];

/// Timestamp forms (spreadsheet exports), tried after the date-only forms.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Years that fit the four-digit canonical form.
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Whether `date` survives a write/read cycle through [`CANONICAL_FORMAT`].
pub fn is_storable(date: NaiveDate) -> bool {
    STORABLE_YEARS.contains(&date.year())
}

/// Parse a date in any supported form. Returns `None` for blank or
/// unrecognised input.
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .filter(|d| is_storable(*d))
}

/// Canonical text for a stored date; unknown dates are written as an empty
/// field.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(CANONICAL_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_supported_forms_normalize_to_same_date() {
        let expected = Some(ymd(2024, 3, 5));
        assert_eq!(normalize_date("2024-03-05"), expected);
        assert_eq!(normalize_date("05/03/2024"), expected);
        assert_eq!(normalize_date("05-03-2024"), expected);
    }

    #[test]
    fn day_first_forms_are_not_read_as_month_first() {
        assert_eq!(normalize_date("13/01/2024"), Some(ymd(2024, 1, 13)));
        assert_eq!(normalize_date("01/13/2024"), None);
    }

    #[test]
    fn timestamp_keeps_date_part() {
        assert_eq!(
            normalize_date("2024-03-05 00:00:00"),
            Some(ymd(2024, 3, 5))
        );
        assert_eq!(
            normalize_date("2024-03-05T14:30:00"),
            Some(ymd(2024, 3, 5))
        );
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(normalize_date("  2024-03-05 "), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn unparseable_is_unknown() {
        assert_eq!(normalize_date("not-a-date"), None);
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("2024-02-30"), None);
        assert_eq!(normalize_date("2024/03/05"), None);
    }

    #[test]
    fn storable_years_are_four_digits() {
        assert!(is_storable(ymd(1, 1, 1)));
        assert!(is_storable(ymd(9999, 12, 31)));
        assert!(!is_storable(ymd(10000, 1, 1)));
        assert!(!is_storable(ymd(0, 6, 1)));
        assert_eq!(format_date(Some(ymd(9999, 12, 31))), "9999-12-31");
        assert_eq!(normalize_date("9999-12-31"), Some(ymd(9999, 12, 31)));
    }

    #[test]
    fn format_is_canonical() {
        assert_eq!(format_date(Some(ymd(2024, 3, 5))), "2024-03-05");
        assert_eq!(format_date(None), "");
    }
}
