//! Form state manager
//!
//! Owns the form content, the per-field error state and the PII override
//! flag. Every edit re-validates the edited field and replaces its entry in
//! the error state.

use tracing::{debug, warn};

use crate::dialog::{ConfirmRequest, Dialogs};
use crate::error::FormError;
use crate::error_state::ErrorState;
use crate::types::{
    Collection, DocumentEntry, DocumentField, FactField, FieldPath, FileAttachment, FormData,
    ScalarField, SupportingFact,
};
use crate::validation::ValidationRules;

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    rules: ValidationRules,
    data: FormData,
    errors: ErrorState,
    pii_override: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(ValidationRules::default())
    }
}

impl FormState {
    pub fn new(rules: ValidationRules) -> Self {
        Self {
            rules,
            data: FormData::default(),
            errors: ErrorState::new(),
            pii_override: false,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn pii_override(&self) -> bool {
        self.pii_override
    }

    pub(crate) fn set_pii_override(&mut self, value: bool) {
        self.pii_override = value;
    }

    /// Back to the empty defaults: content, errors and PII flag
    pub fn reset(&mut self) {
        self.data = FormData::default();
        self.errors.clear();
        self.pii_override = false;
    }

    fn revalidate(&mut self, path: FieldPath, value: &str) {
        let errors = self.rules.validate(path.field_name(), value);
        if !errors.is_empty() {
            debug!(field = %path, count = errors.len(), "field has validation errors");
        }
        self.errors.set(path, errors);
    }

    /// Update prompt or answer
    pub fn set_field(&mut self, field: ScalarField, value: impl Into<String>) {
        let value = value.into();
        self.revalidate(FieldPath::Scalar(field), &value);
        match field {
            ScalarField::Prompt => self.data.prompt = value,
            ScalarField::Answer => self.data.answer = value,
        }
    }

    fn check_index(&self, collection: Collection, index: usize) -> Result<(), FormError> {
        let len = self.data.len_of(collection);
        if index >= len {
            return Err(FormError::IndexOutOfBounds {
                collection,
                index,
                len,
            });
        }
        Ok(())
    }

    pub fn set_supporting_fact(
        &mut self,
        index: usize,
        field: FactField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.check_index(Collection::SupportingFacts, index)?;
        let value = value.into();
        self.revalidate(FieldPath::fact(index, field), &value);
        self.data.supporting_facts[index].set(field, value);
        Ok(())
    }

    /// Update a text field of a document; files go through [`set_document_file`]
    ///
    /// [`set_document_file`]: FormState::set_document_file
    pub fn set_document(
        &mut self,
        index: usize,
        field: DocumentField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.check_index(Collection::Documents, index)?;
        if field == DocumentField::File {
            return Err(FormError::UnknownField(format!(
                "documents.{}.file takes an attachment, not text",
                index
            )));
        }

        let value = value.into();
        self.revalidate(FieldPath::document(index, field), &value);

        let doc = &mut self.data.documents[index];
        match field {
            DocumentField::SecPageLink => doc.sec_page_link = value,
            DocumentField::DatePublished => doc.date_published = value,
            DocumentField::File => {}
        }
        Ok(())
    }

    /// Attach (or clear) the PDF for a document
    pub fn set_document_file(
        &mut self,
        index: usize,
        file: Option<FileAttachment>,
    ) -> Result<(), FormError> {
        self.check_index(Collection::Documents, index)?;
        let path = FieldPath::document(index, DocumentField::File);
        let errors = file
            .as_ref()
            .map(|f| self.rules.validate_attachment(f))
            .unwrap_or_default();
        if let Some(f) = &file {
            debug!(field = %path, name = %f.name, size = f.size(), "attachment selected");
        }
        self.errors.set(path, errors);
        self.data.documents[index].file = file;
        Ok(())
    }

    pub fn add_supporting_fact(&mut self) -> usize {
        self.data.supporting_facts.push(SupportingFact::default());
        self.data.supporting_facts.len() - 1
    }

    pub fn add_document(&mut self) -> usize {
        self.data.documents.push(DocumentEntry::default());
        self.data.documents.len() - 1
    }

    /// Whether the delete control for this collection should be offered
    pub fn can_remove(&self, collection: Collection) -> bool {
        self.data.len_of(collection) > 1
    }

    /// Remove a supporting fact after the user confirms.
    ///
    /// Returns `Ok(false)` when the user declines.
    pub fn remove_supporting_fact(
        &mut self,
        index: usize,
        dialogs: &mut dyn Dialogs,
    ) -> Result<bool, FormError> {
        self.remove_item(
            Collection::SupportingFacts,
            index,
            ConfirmRequest::DeleteSupportingFact { index },
            dialogs,
        )
    }

    /// Remove a document after the user confirms.
    ///
    /// Returns `Ok(false)` when the user declines.
    pub fn remove_document(
        &mut self,
        index: usize,
        dialogs: &mut dyn Dialogs,
    ) -> Result<bool, FormError> {
        self.remove_item(
            Collection::Documents,
            index,
            ConfirmRequest::DeleteDocument { index },
            dialogs,
        )
    }

    fn remove_item(
        &mut self,
        collection: Collection,
        index: usize,
        request: ConfirmRequest,
        dialogs: &mut dyn Dialogs,
    ) -> Result<bool, FormError> {
        self.check_index(collection, index)?;
        if !self.can_remove(collection) {
            warn!(%collection, "refusing to remove the last entry");
            return Err(FormError::LastEntry(collection));
        }

        if !dialogs.confirm(&request) {
            debug!(%collection, index, "removal declined");
            return Ok(false);
        }

        match collection {
            Collection::SupportingFacts => {
                self.data.supporting_facts.remove(index);
            }
            Collection::Documents => {
                self.data.documents.remove(index);
            }
        }
        self.errors.remove_item(collection, index);
        debug!(%collection, index, "entry removed");
        Ok(true)
    }
}
