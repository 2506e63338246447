use thiserror::Error;

use crate::submission::GateState;
use crate::types::Collection;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{collection} index {index} is out of bounds (length {len})")]
    IndexOutOfBounds {
        collection: Collection,
        index: usize,
        len: usize,
    },

    #[error("Cannot remove the last entry of {0}")]
    LastEntry(Collection),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid field path: {0}")]
    InvalidFieldPath(String),

    #[error("Invalid transition from {from:?} on {event}")]
    InvalidTransition { from: GateState, event: String },

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Submission delivery failed: {0}")]
    Delivery(String),
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Serialization(err.to_string())
    }
}
