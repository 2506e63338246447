//! Submission payload and the delivery seam

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::types::{FileAttachment, FormData};

/// What stands in for an uploaded file in the serialized form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl From<&FileAttachment> for FileDescriptor {
    fn from(file: &FileAttachment) -> Self {
        Self {
            name: file.name.clone(),
            size: file.size(),
            mime_type: file.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactPayload {
    pub fact: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub sec_page_link: String,
    pub date_published: String,
    pub file: Option<FileDescriptor>,
}

/// JSON-shaped form handed to the submission collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub prompt: String,
    pub answer: String,
    pub supporting_facts: Vec<FactPayload>,
    pub documents: Vec<DocumentPayload>,
}

impl From<&FormData> for SubmissionPayload {
    fn from(data: &FormData) -> Self {
        Self {
            prompt: data.prompt.clone(),
            answer: data.answer.clone(),
            supporting_facts: data
                .supporting_facts
                .iter()
                .map(|f| FactPayload {
                    fact: f.fact.clone(),
                    source: f.source.clone(),
                })
                .collect(),
            documents: data
                .documents
                .iter()
                .map(|d| DocumentPayload {
                    sec_page_link: d.sec_page_link.clone(),
                    date_published: d.date_published.clone(),
                    file: d.file.as_ref().map(FileDescriptor::from),
                })
                .collect(),
        }
    }
}

impl SubmissionPayload {
    pub fn to_json_pretty(&self) -> Result<String, FormError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Result of handing a payload to the collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Text shown to the user once the payload is accepted
    pub acknowledgment: String,
    pub submitted_at: DateTime<Utc>,
}

/// Receives completed forms
pub trait SubmissionSink {
    fn deliver(&mut self, payload: &SubmissionPayload) -> Result<Receipt, FormError>;
}

/// Accepts every payload and acknowledges it with its pretty-printed JSON.
///
/// There is no backend behind the form yet; this is what the annotator sees.
#[derive(Debug, Default)]
pub struct AcknowledgeSink {
    pub delivered: Vec<SubmissionPayload>,
}

impl SubmissionSink for AcknowledgeSink {
    fn deliver(&mut self, payload: &SubmissionPayload) -> Result<Receipt, FormError> {
        let acknowledgment = payload.to_json_pretty()?;
        self.delivered.push(payload.clone());
        Ok(Receipt {
            acknowledgment,
            submitted_at: Utc::now(),
        })
    }
}
