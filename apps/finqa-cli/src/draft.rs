//! Saved drafts replayed into a form
//!
//! A draft mirrors the submission JSON, except that a document's `file` is
//! a path (relative to the draft) instead of a file descriptor:
//!
//! ```json
//! {
//!   "prompt": "What was total revenue?",
//!   "answer": "Total revenue was $10 million.",
//!   "supportingFacts": [{ "fact": "Revenue: $10M", "source": "10-Q p.3" }],
//!   "documents": [{ "secPageLink": "https://www.sec.gov/...", "datePublished": "2024-05-02", "file": "acme.pdf" }]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use finqa_core::{DocumentField, FactField, FormState, ScalarField};
use serde::Deserialize;
use tracing::debug;

use crate::attachment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DraftFact {
    pub fact: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftDocument {
    pub sec_page_link: String,
    pub date_published: String,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Draft {
    pub prompt: String,
    pub answer: String,
    pub supporting_facts: Vec<DraftFact>,
    pub documents: Vec<DraftDocument>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Draft {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read draft {}", path.display()))?;
        let mut draft: Draft = serde_json::from_str(&json)
            .with_context(|| format!("Invalid draft {}", path.display()))?;
        draft.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(draft)
    }

    /// Enter every value through the form's setters so each field is validated
    pub fn apply(&self, form: &mut FormState) -> anyhow::Result<()> {
        form.set_field(ScalarField::Prompt, self.prompt.as_str());
        form.set_field(ScalarField::Answer, self.answer.as_str());

        for (index, fact) in self.supporting_facts.iter().enumerate() {
            if index >= form.data().supporting_facts.len() {
                form.add_supporting_fact();
            }
            form.set_supporting_fact(index, FactField::Fact, fact.fact.as_str())?;
            form.set_supporting_fact(index, FactField::Source, fact.source.as_str())?;
        }

        for (index, doc) in self.documents.iter().enumerate() {
            if index >= form.data().documents.len() {
                form.add_document();
            }
            form.set_document(index, DocumentField::SecPageLink, doc.sec_page_link.as_str())?;
            form.set_document(index, DocumentField::DatePublished, doc.date_published.as_str())?;
            if let Some(path) = &doc.file {
                let file = attachment::load(&self.base_dir.join(path))?;
                form.set_document_file(index, Some(file))?;
            }
        }

        debug!(
            facts = self.supporting_facts.len(),
            documents = self.documents.len(),
            "draft applied"
        );
        Ok(())
    }
}
