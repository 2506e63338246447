//! Regex patterns for PII detection and date parsing

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// North-American phone number, optional +1 country code
    static ref PHONE_PATTERN: Regex = Regex::new(
        r"(\+?1\s?)?(\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}|[0-9]{10})"
    )
    .unwrap();

    /// US Social Security number, with or without separators
    static ref SSN_PATTERN: Regex =
        Regex::new(r"(?-u:\b)[0-9]{3}[-.\s]?[0-9]{2}[-.\s]?[0-9]{4}(?-u:\b)").unwrap();

    /// Year, or year and month, standing for the first day of that period
    static ref PARTIAL_ISO_DATE: Regex = Regex::new(r"^([0-9]{4})(?:-([0-9]{1,2}))?$").unwrap();
}

/// Full-date layouts accepted besides RFC 3339
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%b %d %Y",
    "%b %d, %Y",
    "%d %b %Y",
];

/// Kinds of PII-like content the form screens free text for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiiMatch {
    PhoneNumber,
    SocialSecurityNumber,
}

pub fn contains_phone_number(text: &str) -> bool {
    PHONE_PATTERN.is_match(text)
}

pub fn contains_ssn(text: &str) -> bool {
    SSN_PATTERN.is_match(text)
}

/// Every PII pattern the text matches, phone first
pub fn detect_pii(text: &str) -> Vec<PiiMatch> {
    let mut found = Vec::new();
    if contains_phone_number(text) {
        found.push(PiiMatch::PhoneNumber);
    }
    if contains_ssn(text) {
        found.push(PiiMatch::SocialSecurityNumber);
    }
    found
}

/// Parse a publication date as a calendar date.
///
/// Accepts `YYYY-MM-DD` (what a date input produces), `YYYY/MM/DD`,
/// month-name forms such as `Sep 30 2023`, and full RFC 3339 timestamps,
/// which are reduced to their UTC date. `YYYY` and `YYYY-MM` stand for the
/// first day of the year or month.
pub fn parse_publication_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = PARTIAL_ISO_DATE.captures(value) {
        let year = caps[1].parse().ok()?;
        let month = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 1,
        };
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc().date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formats() {
        assert!(contains_phone_number("call 555-123-4567 today"));
        assert!(contains_phone_number("(555) 123-4567"));
        assert!(contains_phone_number("+1 555.123.4567"));
        assert!(contains_phone_number("5551234567"));
    }

    #[test]
    fn test_phone_ignores_short_numbers() {
        assert!(!contains_phone_number("Revenue grew 12% to $4,500 million"));
        assert!(!contains_phone_number("fiscal 2023"));
    }

    #[test]
    fn test_ssn_formats() {
        assert!(contains_ssn("SSN 123-45-6789"));
        assert!(contains_ssn("123 45 6789"));
        assert!(contains_ssn("123456789"));
    }

    #[test]
    fn test_ssn_requires_word_boundaries() {
        assert!(!contains_ssn("account 12345678901"));
        assert!(!contains_ssn("x123-45-6789"));
    }

    #[test]
    fn test_ssn_boundary_is_ascii() {
        // A non-ASCII letter is not a word character for the boundary check
        assert!(contains_ssn("é123-45-6789"));
    }

    #[test]
    fn test_detect_pii_reports_both() {
        // Nine digits with separators match the SSN pattern only
        assert_eq!(detect_pii("123-45-6789"), vec![PiiMatch::SocialSecurityNumber]);
        // Ten contiguous digits are a phone number and contain no SSN boundary pair
        assert_eq!(detect_pii("5551234567"), vec![PiiMatch::PhoneNumber]);
        assert_eq!(
            detect_pii("555-123-4567 and 123-45-6789"),
            vec![PiiMatch::PhoneNumber, PiiMatch::SocialSecurityNumber]
        );
        assert!(detect_pii("What was total revenue?").is_empty());
    }

    #[test]
    fn test_parse_publication_date() {
        assert_eq!(
            parse_publication_date("2023-10-01"),
            NaiveDate::from_ymd_opt(2023, 10, 1)
        );
        assert_eq!(
            parse_publication_date("2024-02-29T23:30:00-02:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_publication_date(""), None);
        assert_eq!(parse_publication_date("last tuesday"), None);
        assert_eq!(parse_publication_date("2023-02-30"), None);
    }

    #[test]
    fn test_parse_partial_and_alternate_dates() {
        let sep_first = NaiveDate::from_ymd_opt(2023, 9, 1);
        let sep_30 = NaiveDate::from_ymd_opt(2023, 9, 30);

        assert_eq!(parse_publication_date("2023-09"), sep_first);
        assert_eq!(parse_publication_date("2023-9"), sep_first);
        assert_eq!(parse_publication_date("2023"), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(parse_publication_date("2023/09/30"), sep_30);
        assert_eq!(parse_publication_date("Sep 30 2023"), sep_30);
        assert_eq!(parse_publication_date("Sep 30, 2023"), sep_30);
        assert_eq!(parse_publication_date("30 Sep 2023"), sep_30);
        assert_eq!(parse_publication_date("2023-13"), None);
        assert_eq!(parse_publication_date("20231"), None);
    }
}
