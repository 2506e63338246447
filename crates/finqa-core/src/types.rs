//! Form data model and structured field paths

use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// Scalar free-text fields at the top of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarField {
    Prompt,
    Answer,
}

impl ScalarField {
    pub const ALL: [ScalarField; 2] = [ScalarField::Prompt, ScalarField::Answer];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarField::Prompt => "prompt",
            ScalarField::Answer => "answer",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "prompt" => Some(ScalarField::Prompt),
            "answer" => Some(ScalarField::Answer),
            _ => None,
        }
    }
}

/// Fields of a supporting fact entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactField {
    Fact,
    Source,
}

impl FactField {
    pub const ALL: [FactField; 2] = [FactField::Fact, FactField::Source];

    pub fn name(&self) -> &'static str {
        match self {
            FactField::Fact => "fact",
            FactField::Source => "source",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "fact" => Some(FactField::Fact),
            "source" => Some(FactField::Source),
            _ => None,
        }
    }
}

/// Fields of a document entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentField {
    SecPageLink,
    DatePublished,
    File,
}

impl DocumentField {
    pub const ALL: [DocumentField; 3] = [
        DocumentField::SecPageLink,
        DocumentField::DatePublished,
        DocumentField::File,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DocumentField::SecPageLink => "secPageLink",
            DocumentField::DatePublished => "datePublished",
            DocumentField::File => "file",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "secPageLink" => Some(DocumentField::SecPageLink),
            "datePublished" => Some(DocumentField::DatePublished),
            "file" => Some(DocumentField::File),
            _ => None,
        }
    }
}

/// Repeatable sub-form collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    SupportingFacts,
    Documents,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Collection::SupportingFacts => "supportingFacts",
            Collection::Documents => "documents",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Composite key addressing one input of the form.
///
/// Displays as the dotted path used in the markup, e.g. `documents.0.file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Scalar(ScalarField),
    Fact { index: usize, field: FactField },
    Document { index: usize, field: DocumentField },
}

impl FieldPath {
    pub const PROMPT: FieldPath = FieldPath::Scalar(ScalarField::Prompt);
    pub const ANSWER: FieldPath = FieldPath::Scalar(ScalarField::Answer);

    pub fn fact(index: usize, field: FactField) -> Self {
        FieldPath::Fact { index, field }
    }

    pub fn document(index: usize, field: DocumentField) -> Self {
        FieldPath::Document { index, field }
    }

    /// Bare field name, the key the validator dispatches on
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldPath::Scalar(field) => field.name(),
            FieldPath::Fact { field, .. } => field.name(),
            FieldPath::Document { field, .. } => field.name(),
        }
    }

    pub fn collection(&self) -> Option<Collection> {
        match self {
            FieldPath::Scalar(_) => None,
            FieldPath::Fact { .. } => Some(Collection::SupportingFacts),
            FieldPath::Document { .. } => Some(Collection::Documents),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            FieldPath::Scalar(_) => None,
            FieldPath::Fact { index, .. } | FieldPath::Document { index, .. } => Some(*index),
        }
    }

    /// Same field, different element index. Scalar paths are returned unchanged.
    pub fn with_index(&self, new_index: usize) -> Self {
        match *self {
            FieldPath::Scalar(_) => *self,
            FieldPath::Fact { field, .. } => FieldPath::Fact {
                index: new_index,
                field,
            },
            FieldPath::Document { field, .. } => FieldPath::Document {
                index: new_index,
                field,
            },
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Scalar(field) => f.write_str(field.name()),
            FieldPath::Fact { index, field } => write!(
                f,
                "{}.{}.{}",
                Collection::SupportingFacts.key(),
                index,
                field.name()
            ),
            FieldPath::Document { index, field } => {
                write!(f, "{}.{}.{}", Collection::Documents.key(), index, field.name())
            }
        }
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormError::InvalidFieldPath(s.to_string());

        if let Some(field) = ScalarField::parse(s) {
            return Ok(FieldPath::Scalar(field));
        }

        let mut parts = s.splitn(3, '.');
        let (collection, index, field) = match (parts.next(), parts.next(), parts.next()) {
            (Some(c), Some(i), Some(f)) => (c, i, f),
            _ => return Err(invalid()),
        };
        let index: usize = index.parse().map_err(|_| invalid())?;

        match collection {
            "supportingFacts" => FactField::parse(field)
                .map(|field| FieldPath::Fact { index, field })
                .ok_or_else(invalid),
            "documents" => DocumentField::parse(field)
                .map(|field| FieldPath::Document { index, field })
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

/// A (quote, source) pair substantiating the answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportingFact {
    pub fact: String,
    pub source: String,
}

impl SupportingFact {
    pub fn get(&self, field: FactField) -> &str {
        match field {
            FactField::Fact => &self.fact,
            FactField::Source => &self.source,
        }
    }

    fn slot(&mut self, field: FactField) -> &mut String {
        match field {
            FactField::Fact => &mut self.fact,
            FactField::Source => &mut self.source,
        }
    }

    pub fn set(&mut self, field: FactField, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }
}

/// An uploaded filing PDF held in memory
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Keep file contents out of debug output
impl fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileAttachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// A filing reference: SEC page link, publication date and uploaded PDF
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentEntry {
    pub sec_page_link: String,
    pub date_published: String,
    pub file: Option<FileAttachment>,
}

impl DocumentEntry {
    /// Text value of a field; the file field reads as its name
    pub fn get(&self, field: DocumentField) -> &str {
        match field {
            DocumentField::SecPageLink => &self.sec_page_link,
            DocumentField::DatePublished => &self.date_published,
            DocumentField::File => self.file.as_ref().map(|f| f.name.as_str()).unwrap_or(""),
        }
    }
}

/// Complete form content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    pub prompt: String,
    pub answer: String,
    pub supporting_facts: Vec<SupportingFact>,
    pub documents: Vec<DocumentEntry>,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            answer: String::new(),
            supporting_facts: vec![SupportingFact::default()],
            documents: vec![DocumentEntry::default()],
        }
    }
}

impl FormData {
    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Prompt => &self.prompt,
            ScalarField::Answer => &self.answer,
        }
    }

    pub fn len_of(&self, collection: Collection) -> usize {
        match collection {
            Collection::SupportingFacts => self.supporting_facts.len(),
            Collection::Documents => self.documents.len(),
        }
    }

    /// Every path that is currently empty, in form order
    pub fn missing_fields(&self) -> Vec<FieldPath> {
        let mut missing = Vec::new();

        for field in ScalarField::ALL {
            if self.scalar(field).trim().is_empty() {
                missing.push(FieldPath::Scalar(field));
            }
        }

        for (index, fact) in self.supporting_facts.iter().enumerate() {
            for field in FactField::ALL {
                if fact.get(field).trim().is_empty() {
                    missing.push(FieldPath::fact(index, field));
                }
            }
        }

        for (index, doc) in self.documents.iter().enumerate() {
            for field in DocumentField::ALL {
                let empty = match field {
                    DocumentField::File => doc.file.is_none(),
                    _ => doc.get(field).trim().is_empty(),
                };
                if empty {
                    missing.push(FieldPath::document(index, field));
                }
            }
        }

        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_has_one_of_each() {
        let data = FormData::default();
        assert_eq!(data.supporting_facts.len(), 1);
        assert_eq!(data.documents.len(), 1);
        assert!(data.prompt.is_empty());
        assert!(data.documents[0].file.is_none());
    }

    #[test]
    fn test_field_path_display() {
        assert_eq!(FieldPath::PROMPT.to_string(), "prompt");
        assert_eq!(
            FieldPath::fact(2, FactField::Source).to_string(),
            "supportingFacts.2.source"
        );
        assert_eq!(
            FieldPath::document(0, DocumentField::File).to_string(),
            "documents.0.file"
        );
    }

    #[test]
    fn test_field_path_parse() {
        assert_eq!("answer".parse::<FieldPath>().unwrap(), FieldPath::ANSWER);
        assert_eq!(
            "documents.3.datePublished".parse::<FieldPath>().unwrap(),
            FieldPath::document(3, DocumentField::DatePublished)
        );
        assert_eq!(
            "supportingFacts.0.fact".parse::<FieldPath>().unwrap(),
            FieldPath::fact(0, FactField::Fact)
        );
    }

    #[test]
    fn test_field_path_parse_rejects_garbage() {
        assert!("documents.x.file".parse::<FieldPath>().is_err());
        assert!("documents.0.fact".parse::<FieldPath>().is_err());
        assert!("attachments.0.file".parse::<FieldPath>().is_err());
        assert!("".parse::<FieldPath>().is_err());
        assert!("documents.0".parse::<FieldPath>().is_err());
    }

    #[test]
    fn test_with_index_keeps_field() {
        let path = FieldPath::document(4, DocumentField::SecPageLink);
        assert_eq!(
            path.with_index(3),
            FieldPath::document(3, DocumentField::SecPageLink)
        );
        assert_eq!(FieldPath::PROMPT.with_index(7), FieldPath::PROMPT);
    }

    #[test]
    fn test_missing_fields_on_empty_form() {
        let missing = FormData::default().missing_fields();
        // prompt, answer, fact, source, link, date, file
        assert_eq!(missing.len(), 7);
        assert_eq!(missing[0], FieldPath::PROMPT);
        assert_eq!(missing[6], FieldPath::document(0, DocumentField::File));
    }

    #[test]
    fn test_attachment_debug_hides_bytes() {
        let file = FileAttachment::new("10q.pdf", "application/pdf", vec![0u8; 2048]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("size: 2048"));
        assert_eq!(file.size(), 2048);
    }
}
