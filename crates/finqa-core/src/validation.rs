//! Field-level validation rules
//!
//! Validation is a pure function of (field name, value). Results are ordered
//! and each error carries its kind, so the submission gate can tell soft PII
//! warnings from hard failures without matching on message text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::patterns::{detect_pii, parse_publication_date};
use crate::types::FileAttachment;

pub const DEFAULT_MIN_TEXT_LENGTH: usize = 10;
pub const DEFAULT_SEC_LINK_PREFIX: &str = "https://www.sec.gov/";
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Validation error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    TooShort,
    PotentialPii,
    InvalidUrl,
    DateTooEarly,
    InvalidDate,
    InvalidAttachment,
}

impl ErrorKind {
    /// PII warnings can be acknowledged by the user; everything else blocks
    pub fn is_soft(&self) -> bool {
        matches!(self, ErrorKind::PotentialPii)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Tunable constants and policy switches for the validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationRules {
    pub min_text_length: usize,
    pub sec_link_prefix: String,
    pub earliest_publication: NaiveDate,
    /// Report at most one PII error per field even if several patterns match
    pub dedupe_pii: bool,
    /// Treat a non-empty date that does not parse as an error
    pub reject_unparsable_dates: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            sec_link_prefix: DEFAULT_SEC_LINK_PREFIX.to_string(),
            earliest_publication: default_earliest_publication(),
            dedupe_pii: true,
            reject_unparsable_dates: false,
        }
    }
}

fn default_earliest_publication() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 1).unwrap_or(NaiveDate::MIN)
}

impl ValidationRules {
    /// Validate one field value, dispatching on the bare field name
    pub fn validate(&self, field: &str, value: &str) -> Vec<FieldError> {
        match field {
            "prompt" | "answer" => self.validate_free_text(field, value),
            "secPageLink" => self.validate_sec_link(value),
            "datePublished" => self.validate_publication_date(value),
            _ => Vec::new(),
        }
    }

    fn validate_free_text(&self, field: &str, value: &str) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if value.chars().count() < self.min_text_length {
            errors.push(FieldError::new(
                ErrorKind::TooShort,
                format!("{} must be at least {} characters", field, self.min_text_length),
            ));
        }

        let matches = detect_pii(value);
        let pii_errors = if self.dedupe_pii {
            matches.len().min(1)
        } else {
            matches.len()
        };
        for _ in 0..pii_errors {
            errors.push(FieldError::new(
                ErrorKind::PotentialPii,
                format!("{} may contain PII", field),
            ));
        }

        errors
    }

    fn validate_sec_link(&self, value: &str) -> Vec<FieldError> {
        if value.starts_with(&self.sec_link_prefix) {
            Vec::new()
        } else {
            vec![FieldError::new(
                ErrorKind::InvalidUrl,
                format!("Link must start with {}", self.sec_link_prefix),
            )]
        }
    }

    fn validate_publication_date(&self, value: &str) -> Vec<FieldError> {
        match parse_publication_date(value) {
            Some(date) if date < self.earliest_publication => vec![FieldError::new(
                ErrorKind::DateTooEarly,
                format!(
                    "Date must be after {}",
                    self.earliest_publication.format("%B %Y")
                ),
            )],
            Some(_) => Vec::new(),
            None if self.reject_unparsable_dates && !value.trim().is_empty() => {
                vec![FieldError::new(
                    ErrorKind::InvalidDate,
                    "Date must be a valid date",
                )]
            }
            None => Vec::new(),
        }
    }

    /// Check a selected attachment is a PDF by MIME type and header bytes
    pub fn validate_attachment(&self, file: &FileAttachment) -> Vec<FieldError> {
        let declared_pdf = if file.mime_type.is_empty() {
            file.name.to_lowercase().ends_with(".pdf")
        } else {
            file.mime_type.eq_ignore_ascii_case(PDF_MIME_TYPE)
        };

        if declared_pdf && file.bytes.starts_with(b"%PDF-") {
            Vec::new()
        } else {
            vec![FieldError::new(
                ErrorKind::InvalidAttachment,
                "File must be a PDF",
            )]
        }
    }
}

/// Validate with the default rules
pub fn validate_field(field: &str, value: &str) -> Vec<FieldError> {
    ValidationRules::default().validate(field, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(errors: &[FieldError]) -> Vec<ErrorKind> {
        errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_short_prompt() {
        let errors = validate_field("prompt", "Revenue?");
        assert_eq!(
            errors,
            vec![FieldError::new(
                ErrorKind::TooShort,
                "prompt must be at least 10 characters"
            )]
        );
    }

    #[test]
    fn test_exactly_min_length_passes() {
        assert!(validate_field("answer", "abcdefghij").is_empty());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Nine characters, more than ten bytes
        assert_eq!(kinds(&validate_field("answer", "ééééééééé")), vec![ErrorKind::TooShort]);
    }

    #[test]
    fn test_astral_characters_count_once() {
        // Five characters, ten UTF-16 units
        let value = "📈📈📈📈📈";
        assert_eq!(kinds(&validate_field("answer", value)), vec![ErrorKind::TooShort]);
        assert!(validate_field("answer", &value.repeat(2)).is_empty());
    }

    #[test]
    fn test_pii_message_names_field() {
        let errors = validate_field("answer", "Call the CFO at 555-123-4567");
        assert_eq!(kinds(&errors), vec![ErrorKind::PotentialPii]);
        assert_eq!(errors[0].message, "answer may contain PII");
    }

    #[test]
    fn test_short_and_pii_both_reported() {
        let errors = validate_field("prompt", "123456789");
        assert_eq!(kinds(&errors), vec![ErrorKind::TooShort, ErrorKind::PotentialPii]);
    }

    #[test]
    fn test_pii_deduplicated_by_default() {
        let text = "Phone 555-123-4567, SSN 123-45-6789";
        assert_eq!(kinds(&validate_field("prompt", text)), vec![ErrorKind::PotentialPii]);
    }

    #[test]
    fn test_pii_duplicates_when_dedupe_disabled() {
        let rules = ValidationRules {
            dedupe_pii: false,
            ..Default::default()
        };
        let text = "Phone 555-123-4567, SSN 123-45-6789";
        assert_eq!(
            kinds(&rules.validate("prompt", text)),
            vec![ErrorKind::PotentialPii, ErrorKind::PotentialPii]
        );
    }

    #[test]
    fn test_sec_link() {
        assert_eq!(
            kinds(&validate_field("secPageLink", "http://example.com")),
            vec![ErrorKind::InvalidUrl]
        );
        assert!(validate_field("secPageLink", "https://www.sec.gov/Archives/x").is_empty());
        assert_eq!(
            validate_field("secPageLink", "http://www.sec.gov/")[0].message,
            "Link must start with https://www.sec.gov/"
        );
    }

    #[test]
    fn test_publication_date() {
        let errors = validate_field("datePublished", "2023-09-30");
        assert_eq!(kinds(&errors), vec![ErrorKind::DateTooEarly]);
        assert_eq!(errors[0].message, "Date must be after October 2023");

        assert!(validate_field("datePublished", "2023-10-02").is_empty());
        assert!(validate_field("datePublished", "2023-10-01").is_empty());
    }

    #[test]
    fn test_unparsable_date_passes_by_default() {
        assert!(validate_field("datePublished", "not a date").is_empty());
        assert!(validate_field("datePublished", "").is_empty());
    }

    #[test]
    fn test_unparsable_date_rejected_when_configured() {
        let rules = ValidationRules {
            reject_unparsable_dates: true,
            ..Default::default()
        };
        assert_eq!(
            kinds(&rules.validate("datePublished", "not a date")),
            vec![ErrorKind::InvalidDate]
        );
        // Empty stays unvalidated
        assert!(rules.validate("datePublished", "").is_empty());
    }

    #[test]
    fn test_unknown_fields_have_no_rules() {
        assert!(validate_field("fact", "").is_empty());
        assert!(validate_field("source", "x").is_empty());
        assert!(validate_field("file", "C:\\fakepath\\a.txt").is_empty());
    }

    #[test]
    fn test_attachment_check() {
        let rules = ValidationRules::default();
        let pdf = FileAttachment::new("10k.pdf", "application/pdf", b"%PDF-1.7\n".to_vec());
        assert!(rules.validate_attachment(&pdf).is_empty());

        let untyped = FileAttachment::new("10K.PDF", "", b"%PDF-1.4".to_vec());
        assert!(rules.validate_attachment(&untyped).is_empty());

        let text = FileAttachment::new("notes.txt", "text/plain", b"%PDF-1.7".to_vec());
        assert_eq!(
            kinds(&rules.validate_attachment(&text)),
            vec![ErrorKind::InvalidAttachment]
        );

        let disguised = FileAttachment::new("fake.pdf", "application/pdf", b"PK\x03\x04".to_vec());
        assert_eq!(
            rules.validate_attachment(&disguised)[0].message,
            "File must be a PDF"
        );
    }

    #[test]
    fn test_rules_deserialize_with_defaults() {
        let rules: ValidationRules =
            serde_json::from_str(r#"{"minTextLength": 20, "earliestPublication": "2024-01-01"}"#)
                .unwrap();
        assert_eq!(rules.min_text_length, 20);
        assert_eq!(rules.earliest_publication, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rules.sec_link_prefix, DEFAULT_SEC_LINK_PREFIX);
        assert!(rules.dedupe_pii);
        assert_eq!(
            rules.validate("datePublished", "2023-12-31")[0].message,
            "Date must be after January 2024"
        );
    }
}
