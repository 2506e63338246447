//! Submission gate
//!
//! A small table-driven state machine deciding whether a form may be handed
//! off:
//!
//! ```text
//! Idle -> Validating -> Blocked           -> Idle   (alert dismissed)
//!                    -> PiiConfirmPending -> Idle   (declined)
//!                                         -> Submitting
//!                    -> Submitting        -> Idle   (completed, cancelled, failed)
//! ```
//!
//! Each call returns a [`GateStep`] telling the caller which interaction is
//! needed next, so front-ends can await their own dialogs between steps.

use std::fmt;

use tracing::{debug, info};

use crate::dialog::ConfirmRequest;
use crate::error::FormError;
use crate::form::FormState;
use crate::payload::SubmissionPayload;
use crate::types::FieldPath;

pub const FORM_ERRORS_MESSAGE: &str = "The form contains errors. Please fix them before submitting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    Validating,
    Blocked,
    PiiConfirmPending,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateEvent {
    Submit,
    Cleared,
    NeedsPiiConfirmation,
    Rejected,
    Dismissed,
    PiiConfirmed,
    PiiDeclined,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for GateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Transition table; `None` means the event is not accepted in that state
fn next_state(state: GateState, event: GateEvent) -> Option<GateState> {
    use GateEvent::*;
    use GateState::*;

    match (state, event) {
        (Idle, Submit) => Some(Validating),
        (Validating, Cleared) => Some(Submitting),
        (Validating, NeedsPiiConfirmation) => Some(PiiConfirmPending),
        (Validating, Rejected) => Some(Blocked),
        (Blocked, Dismissed) => Some(Idle),
        (PiiConfirmPending, PiiConfirmed) => Some(Submitting),
        (PiiConfirmPending, PiiDeclined) => Some(Idle),
        (Submitting, Completed) | (Submitting, Cancelled) | (Submitting, Failed) => Some(Idle),
        _ => None,
    }
}

/// Outcome of assessing the form at submit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Required inputs are empty (only when completeness is enforced)
    Incomplete(Vec<FieldPath>),
    /// Some document field has errors; never overridable
    DocumentErrors(Vec<FieldPath>),
    /// Prompt or answer has at least one hard error
    TextErrors,
    /// Prompt/answer errors are all PII warnings
    PiiOnly,
    Clear,
}

impl Verdict {
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Verdict::PiiOnly | Verdict::Clear)
    }

    /// Alert text for a blocking verdict
    pub fn alert_message(&self) -> Option<String> {
        match self {
            Verdict::Incomplete(paths) => Some(format!(
                "Please fill out: {}",
                paths
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Verdict::DocumentErrors(_) | Verdict::TextErrors => Some(FORM_ERRORS_MESSAGE.to_string()),
            Verdict::PiiOnly | Verdict::Clear => None,
        }
    }
}

/// What the caller has to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStep {
    /// Show `message`, then call [`SubmissionGate::dismiss`]
    Blocked { verdict: Verdict, message: String },
    /// Ask the user, then call [`SubmissionGate::resolve_pii`]
    ConfirmPii(ConfirmRequest),
    /// Hand the payload off, then [`SubmissionGate::complete`] after the delay
    Ready(SubmissionPayload),
    /// The user declined; back to idle
    Declined,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    state: GateState,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// A submission is underway and the submit control should be disabled
    pub fn is_pending(&self) -> bool {
        self.state != GateState::Idle
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_pending() {
            "Submitting..."
        } else {
            "Submit"
        }
    }

    fn fire(&mut self, event: GateEvent) -> Result<GateState, FormError> {
        let next = next_state(self.state, event).ok_or_else(|| FormError::InvalidTransition {
            from: self.state,
            event: event.to_string(),
        })?;
        debug!(from = ?self.state, to = ?next, %event, "submission gate transition");
        self.state = next;
        Ok(next)
    }

    /// Decide what submitting the form right now would do, without side effects
    pub fn assess(form: &FormState, require_complete: bool) -> Verdict {
        if require_complete {
            let missing = form.data().missing_fields();
            if !missing.is_empty() {
                return Verdict::Incomplete(missing);
            }
        }

        let errors = form.errors();
        let mut document_paths: Vec<FieldPath> = errors
            .document_errors(form.data().documents.len())
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        document_paths.dedup();
        if !document_paths.is_empty() {
            return Verdict::DocumentErrors(document_paths);
        }

        let text_errors = errors.text_errors();
        if text_errors.is_empty() {
            Verdict::Clear
        } else if text_errors.iter().all(|e| e.kind.is_soft()) {
            Verdict::PiiOnly
        } else {
            Verdict::TextErrors
        }
    }

    /// Start a submission
    pub fn begin(&mut self, form: &FormState, require_complete: bool) -> Result<GateStep, FormError> {
        if self.state != GateState::Idle {
            return Err(FormError::SubmissionInProgress);
        }
        self.fire(GateEvent::Submit)?;

        let verdict = Self::assess(form, require_complete);
        match verdict {
            Verdict::Clear => {
                self.fire(GateEvent::Cleared)?;
                Ok(GateStep::Ready(SubmissionPayload::from(form.data())))
            }
            Verdict::PiiOnly => {
                self.fire(GateEvent::NeedsPiiConfirmation)?;
                Ok(GateStep::ConfirmPii(ConfirmRequest::PiiAcknowledgment))
            }
            blocking => {
                self.fire(GateEvent::Rejected)?;
                let message = blocking.alert_message().unwrap_or_default();
                debug!(verdict = ?blocking, "submission blocked");
                Ok(GateStep::Blocked {
                    verdict: blocking,
                    message,
                })
            }
        }
    }

    /// The blocking alert was shown
    pub fn dismiss(&mut self) -> Result<(), FormError> {
        self.fire(GateEvent::Dismissed).map(|_| ())
    }

    /// Apply the user's answer to the PII acknowledgment
    pub fn resolve_pii(&mut self, form: &mut FormState, confirmed: bool) -> Result<GateStep, FormError> {
        if confirmed {
            self.fire(GateEvent::PiiConfirmed)?;
            form.set_pii_override(true);
            info!("PII warning acknowledged by user");
            Ok(GateStep::Ready(SubmissionPayload::from(form.data())))
        } else {
            self.fire(GateEvent::PiiDeclined)?;
            Ok(GateStep::Declined)
        }
    }

    /// The deferred completion fired: reset the form
    pub fn complete(&mut self, form: &mut FormState) -> Result<(), FormError> {
        self.fire(GateEvent::Completed)?;
        form.reset();
        info!("submission completed, form reset");
        Ok(())
    }

    /// Abandon the deferred completion; the form keeps its content
    pub fn cancel(&mut self) -> Result<(), FormError> {
        self.fire(GateEvent::Cancelled)?;
        info!("submission cancelled");
        Ok(())
    }

    /// The collaborator rejected the payload
    pub fn fail(&mut self) -> Result<(), FormError> {
        self.fire(GateEvent::Failed).map(|_| ())
    }
}
