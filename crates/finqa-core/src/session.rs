//! One annotator's form: state manager, submission gate and configuration

use std::time::Duration;

use tracing::{info, warn};

use crate::config::FormConfig;
use crate::dialog::Dialogs;
use crate::error::FormError;
use crate::form::FormState;
use crate::payload::{Receipt, SubmissionSink};
use crate::submission::{GateState, GateStep, SubmissionGate, Verdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// An alert was shown and nothing was submitted
    Blocked(Verdict),
    /// The user declined the PII acknowledgment
    Declined,
    /// Handed off; call [`FormSession::complete_submission`] after `complete_after`
    Submitted {
        receipt: Receipt,
        complete_after: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct FormSession {
    config: FormConfig,
    form: FormState,
    gate: SubmissionGate,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl FormSession {
    pub fn new(config: FormConfig) -> Self {
        let form = FormState::new(config.rules.clone());
        Self {
            config,
            form,
            gate: SubmissionGate::new(),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    pub fn submit_label(&self) -> &'static str {
        self.gate.submit_label()
    }

    /// Dry run of the submission decision
    pub fn assess(&self) -> Verdict {
        SubmissionGate::assess(&self.form, self.config.require_complete)
    }

    /// Run the gate through to hand-off, asking `dialogs` where needed.
    ///
    /// On success the gate stays in `Submitting` until
    /// [`complete_submission`](Self::complete_submission) or
    /// [`cancel_submission`](Self::cancel_submission) is called.
    pub fn submit(
        &mut self,
        dialogs: &mut dyn Dialogs,
        sink: &mut dyn SubmissionSink,
    ) -> Result<SubmitOutcome, FormError> {
        let mut step = self.gate.begin(&self.form, self.config.require_complete)?;

        loop {
            step = match step {
                GateStep::Blocked { verdict, message } => {
                    dialogs.alert(&message);
                    self.gate.dismiss()?;
                    return Ok(SubmitOutcome::Blocked(verdict));
                }
                GateStep::ConfirmPii(request) => {
                    let confirmed = dialogs.confirm(&request);
                    self.gate.resolve_pii(&mut self.form, confirmed)?
                }
                GateStep::Declined => return Ok(SubmitOutcome::Declined),
                GateStep::Ready(payload) => {
                    let receipt = match sink.deliver(&payload) {
                        Ok(receipt) => receipt,
                        Err(e) => {
                            warn!(error = %e, "submission delivery failed");
                            self.gate.fail()?;
                            self.form.set_pii_override(false);
                            return Err(e);
                        }
                    };
                    info!(
                        documents = payload.documents.len(),
                        facts = payload.supporting_facts.len(),
                        "submission handed off"
                    );
                    dialogs.alert(&receipt.acknowledgment);
                    return Ok(SubmitOutcome::Submitted {
                        receipt,
                        complete_after: self.config.submit_delay(),
                    });
                }
            };
        }
    }

    pub fn complete_submission(&mut self) -> Result<(), FormError> {
        self.gate.complete(&mut self.form)
    }

    pub fn cancel_submission(&mut self) -> Result<(), FormError> {
        self.gate.cancel()
    }
}
