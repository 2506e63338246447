//! Per-field validation results keyed by structured path

use std::collections::BTreeMap;

use crate::types::{Collection, FieldPath, ScalarField};
use crate::validation::{ErrorKind, FieldError};

/// Latest validation result for every field that has been edited.
///
/// A field that was edited and passed keeps an empty entry; fields never
/// touched have no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    entries: BTreeMap<FieldPath, Vec<FieldError>>,
}

impl ErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the errors for a field (last validation run wins)
    pub fn set(&mut self, path: FieldPath, errors: Vec<FieldError>) {
        self.entries.insert(path, errors);
    }

    pub fn get(&self, path: &FieldPath) -> &[FieldError] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn messages(&self, path: &FieldPath) -> Vec<String> {
        self.get(path).iter().map(|e| e.message.clone()).collect()
    }

    pub fn has_errors(&self, path: &FieldPath) -> bool {
        !self.get(path).is_empty()
    }

    /// True when no field currently has an error
    pub fn is_clean(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// True when no field has been validated yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[FieldError])> {
        self.entries.iter().map(|(path, errors)| (path, errors.as_slice()))
    }

    /// Errors for prompt and answer, in that order
    pub fn text_errors(&self) -> Vec<&FieldError> {
        ScalarField::ALL
            .iter()
            .flat_map(|field| self.get(&FieldPath::Scalar(*field)))
            .collect()
    }

    /// Errors for every document sub-field of the first `count` documents
    pub fn document_errors(&self, count: usize) -> Vec<(FieldPath, &FieldError)> {
        self.entries
            .iter()
            .filter(|(path, _)| matches!(path, FieldPath::Document { index, .. } if *index < count))
            .flat_map(|(path, errors)| errors.iter().map(move |e| (*path, e)))
            .collect()
    }

    pub fn has_kind(&self, path: &FieldPath, kind: ErrorKind) -> bool {
        self.get(path).iter().any(|e| e.kind == kind)
    }

    /// Drop the entries of a removed element and shift later elements down
    pub fn remove_item(&mut self, collection: Collection, removed: usize) {
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .filter_map(|(path, errors)| {
                if path.collection() != Some(collection) {
                    return Some((path, errors));
                }
                match path.index() {
                    Some(index) if index == removed => None,
                    Some(index) if index > removed => Some((path.with_index(index - 1), errors)),
                    _ => Some((path, errors)),
                }
            })
            .collect();
    }

    /// Flatten to dotted-path keys and message lists for display layers
    pub fn to_message_map(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(path, errors)| {
                (
                    path.to_string(),
                    errors.iter().map(|e| e.message.clone()).collect(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentField, FactField};
    use pretty_assertions::assert_eq;

    fn err(kind: ErrorKind, msg: &str) -> FieldError {
        FieldError::new(kind, msg)
    }

    #[test]
    fn test_set_replaces_previous_errors() {
        let mut state = ErrorState::new();
        state.set(FieldPath::PROMPT, vec![err(ErrorKind::TooShort, "short")]);
        state.set(FieldPath::PROMPT, vec![]);
        assert!(!state.has_errors(&FieldPath::PROMPT));
        assert!(!state.is_empty());
        assert!(state.is_clean());
    }

    #[test]
    fn test_text_errors_collects_prompt_then_answer() {
        let mut state = ErrorState::new();
        state.set(FieldPath::ANSWER, vec![err(ErrorKind::PotentialPii, "a")]);
        state.set(FieldPath::PROMPT, vec![err(ErrorKind::TooShort, "p")]);
        let messages: Vec<_> = state.text_errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["p", "a"]);
    }

    #[test]
    fn test_document_errors_respects_count() {
        let mut state = ErrorState::new();
        state.set(
            FieldPath::document(0, DocumentField::SecPageLink),
            vec![err(ErrorKind::InvalidUrl, "url")],
        );
        state.set(
            FieldPath::document(2, DocumentField::DatePublished),
            vec![err(ErrorKind::DateTooEarly, "date")],
        );
        state.set(FieldPath::fact(0, FactField::Fact), vec![err(ErrorKind::TooShort, "x")]);

        assert_eq!(state.document_errors(1).len(), 1);
        assert_eq!(state.document_errors(3).len(), 2);
    }

    #[test]
    fn test_remove_item_shifts_later_entries() {
        let mut state = ErrorState::new();
        let link = |i| FieldPath::document(i, DocumentField::SecPageLink);
        state.set(link(0), vec![err(ErrorKind::InvalidUrl, "zero")]);
        state.set(link(1), vec![err(ErrorKind::InvalidUrl, "one")]);
        state.set(link(2), vec![err(ErrorKind::InvalidUrl, "two")]);
        state.set(FieldPath::fact(1, FactField::Fact), vec![]);

        state.remove_item(Collection::Documents, 1);

        assert_eq!(state.messages(&link(0)), vec!["zero"]);
        assert_eq!(state.messages(&link(1)), vec!["two"]);
        assert!(state.get(&link(2)).is_empty());
        // Other collections untouched
        assert!(state.iter().any(|(p, _)| *p == FieldPath::fact(1, FactField::Fact)));
    }

    #[test]
    fn test_message_map_uses_dotted_keys() {
        let mut state = ErrorState::new();
        state.set(
            FieldPath::document(0, DocumentField::File),
            vec![err(ErrorKind::InvalidAttachment, "File must be a PDF")],
        );
        let map = state.to_message_map();
        assert_eq!(map["documents.0.file"], vec!["File must be a PDF".to_string()]);
    }
}
