//! User interaction seam
//!
//! Deletions and the PII acknowledgment need an explicit yes/no from the
//! user, and blocked submissions need an alert. Front-ends implement
//! [`Dialogs`] with whatever their platform offers: browser dialogs,
//! terminal prompts, or a scripted responder in tests.

use std::collections::VecDeque;

/// A question that needs an explicit yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmRequest {
    DeleteSupportingFact { index: usize },
    DeleteDocument { index: usize },
    PiiAcknowledgment,
}

impl ConfirmRequest {
    pub fn message(&self) -> &'static str {
        match self {
            ConfirmRequest::DeleteSupportingFact { .. } => {
                "Are you sure you want to delete this supporting fact?"
            }
            ConfirmRequest::DeleteDocument { .. } => {
                "Are you sure you want to delete this document?"
            }
            ConfirmRequest::PiiAcknowledgment => {
                "The prompt or answer may contain PII. Do you confirm that it does not contain PII?"
            }
        }
    }
}

pub trait Dialogs {
    /// Ask the user to confirm; `false` means declined
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;

    /// Show a message the user must dismiss
    fn alert(&mut self, message: &str);
}

/// Dialogs answered from a fixed script, recording everything shown
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    answers: VecDeque<bool>,
    default_answer: bool,
    pub confirmations: Vec<ConfirmRequest>,
    pub alerts: Vec<String>,
}

impl ScriptedDialogs {
    /// Answer every confirmation with `answer`
    pub fn always(answer: bool) -> Self {
        Self {
            default_answer: answer,
            ..Default::default()
        }
    }

    /// Answer confirmations in order, then decline
    pub fn answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self.confirmations.push(*request);
        self.answers.pop_front().unwrap_or(self.default_answer)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_then_default() {
        let mut dialogs = ScriptedDialogs::answers([true, false]);
        let req = ConfirmRequest::PiiAcknowledgment;
        assert!(dialogs.confirm(&req));
        assert!(!dialogs.confirm(&req));
        assert!(!dialogs.confirm(&req));
        assert_eq!(dialogs.confirmations.len(), 3);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ConfirmRequest::DeleteDocument { index: 0 }.message(),
            "Are you sure you want to delete this document?"
        );
        assert!(ConfirmRequest::PiiAcknowledgment.message().contains("may contain PII"));
    }
}
