//! Plain-text rendering of the form and its errors

use std::fmt::Write;

use finqa_core::layout::wrap_rows;
use finqa_core::{
    DocumentField, ErrorState, FactField, FieldPath, FormState, ScalarField, Verdict,
};

const INDENT: &str = "    ";

fn field(out: &mut String, label: &str, value: &str, path: &FieldPath, errors: &ErrorState, columns: usize) {
    let width = columns.saturating_sub(INDENT.len()).max(10);
    let _ = writeln!(out, "  {}:", label);
    if value.is_empty() {
        let _ = writeln!(out, "{}(empty)", INDENT);
    } else {
        for row in wrap_rows(value, width) {
            let _ = writeln!(out, "{}{}", INDENT, row);
        }
    }
    for message in errors.messages(path) {
        let _ = writeln!(out, "{}! {}", INDENT, message);
    }
}

/// The whole form with each field's errors underneath it
pub fn render_form(form: &FormState, columns: usize) -> String {
    let data = form.data();
    let errors = form.errors();
    let mut out = String::new();

    for scalar in ScalarField::ALL {
        let label = match scalar {
            ScalarField::Prompt => "Prompt",
            ScalarField::Answer => "Answer",
        };
        field(&mut out, label, data.scalar(scalar), &FieldPath::Scalar(scalar), errors, columns);
    }

    let _ = writeln!(out, "Supporting facts:");
    for (index, fact) in data.supporting_facts.iter().enumerate() {
        let _ = writeln!(out, " [{}]", index);
        for f in FactField::ALL {
            let label = match f {
                FactField::Fact => "Fact",
                FactField::Source => "Source",
            };
            field(&mut out, label, fact.get(f), &FieldPath::fact(index, f), errors, columns);
        }
    }

    let _ = writeln!(out, "Documents:");
    for (index, doc) in data.documents.iter().enumerate() {
        let _ = writeln!(out, " [{}]", index);
        let link = FieldPath::document(index, DocumentField::SecPageLink);
        field(&mut out, "SEC page link", &doc.sec_page_link, &link, errors, columns);
        let date = FieldPath::document(index, DocumentField::DatePublished);
        field(&mut out, "Date published", &doc.date_published, &date, errors, columns);

        let file = match &doc.file {
            Some(file) => format!("{} ({} bytes, {})", file.name, file.size(), file.mime_type),
            None => String::new(),
        };
        let path = FieldPath::document(index, DocumentField::File);
        field(&mut out, "File", &file, &path, errors, columns);
    }
    out
}

/// One line per error, keyed by field path
pub fn render_errors(errors: &ErrorState) -> String {
    if errors.is_clean() {
        return "No errors.\n".to_string();
    }
    let mut out = String::new();
    for (path, field_errors) in errors.iter() {
        for error in field_errors {
            let _ = writeln!(out, "{}: {}", path, error.message);
        }
    }
    out
}

pub fn describe_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Clear => "Ready to submit.".to_string(),
        Verdict::PiiOnly => {
            "Ready to submit once you confirm the prompt and answer contain no PII.".to_string()
        }
        blocking => blocking.alert_message().unwrap_or_default(),
    }
}
