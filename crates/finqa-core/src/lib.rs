//! Finance Q/A data-point form
//!
//! Everything the annotation form does apart from drawing it: the data
//! model, field validation, the per-field error state, add/remove
//! bookkeeping for the repeatable sub-forms, and the submission gate that
//! turns a form into a JSON payload.
//!
//! ## Usage
//!
//! ```
//! use finqa_core::{AcknowledgeSink, FormSession, ScalarField, ScriptedDialogs, SubmitOutcome};
//!
//! let mut session = FormSession::default();
//! session.form_mut().set_field(ScalarField::Prompt, "What was total revenue in Q3?");
//! session.form_mut().set_field(ScalarField::Answer, "Total revenue was $10 million.");
//!
//! let mut dialogs = ScriptedDialogs::always(true);
//! let mut sink = AcknowledgeSink::default();
//! let outcome = session.submit(&mut dialogs, &mut sink).unwrap();
//! assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
//!
//! // After the simulated latency:
//! session.complete_submission().unwrap();
//! assert!(session.form().data().prompt.is_empty());
//! ```

pub mod config;
pub mod dialog;
pub mod error;
pub mod error_state;
pub mod form;
pub mod instructions;
pub mod layout;
pub mod patterns;
pub mod payload;
pub mod session;
pub mod submission;
pub mod types;
pub mod validation;

pub use config::FormConfig;
pub use dialog::{ConfirmRequest, Dialogs, ScriptedDialogs};
pub use error::FormError;
pub use error_state::ErrorState;
pub use form::FormState;
pub use instructions::{Instructions, INSTRUCTIONS};
pub use payload::{AcknowledgeSink, Receipt, SubmissionPayload, SubmissionSink};
pub use session::{FormSession, SubmitOutcome};
pub use submission::{GateState, GateStep, SubmissionGate, Verdict};
pub use types::{
    Collection, DocumentEntry, DocumentField, FactField, FieldPath, FileAttachment, FormData,
    ScalarField, SupportingFact,
};
pub use validation::{validate_field, ErrorKind, FieldError, ValidationRules};
