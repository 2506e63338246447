//! Stateful form session
//!
//! Holds the form, its errors and the submission gate in Rust memory. The
//! page forwards every edit here and re-reads errors and labels afterwards.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use finqa_core::{
    AcknowledgeSink, Collection, Dialogs, DocumentField, FactField, FieldPath, FileAttachment,
    FormConfig, FormSession, ScalarField, SubmissionPayload, SubmitOutcome,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dialogs::JsDialogs;

/// Outcome of a submit click for JS
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResultJs {
    /// "blocked", "declined" or "submitted"
    status: &'static str,
    message: Option<String>,
    submitted_at: Option<String>,
    complete_after_ms: Option<u64>,
}

impl From<&SubmitOutcome> for SubmitResultJs {
    fn from(outcome: &SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Blocked(verdict) => Self {
                status: "blocked",
                message: verdict.alert_message(),
                submitted_at: None,
                complete_after_ms: None,
            },
            SubmitOutcome::Declined => Self {
                status: "declined",
                message: None,
                submitted_at: None,
                complete_after_ms: None,
            },
            SubmitOutcome::Submitted {
                receipt,
                complete_after,
            } => Self {
                status: "submitted",
                message: Some(receipt.acknowledgment.clone()),
                submitted_at: Some(receipt.submitted_at.to_rfc3339()),
                complete_after_ms: Some(complete_after.as_millis() as u64),
            },
        }
    }
}

/// One annotator's form, held in Rust memory
#[wasm_bindgen]
pub struct FinqaSession {
    core: Rc<RefCell<FormSession>>,
    pending_timer: Rc<Cell<Option<i32>>>,
    confirm_callback: Option<js_sys::Function>,
    alert_callback: Option<js_sys::Function>,
    reset_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl FinqaSession {
    /// Create a session, optionally from a JSON `FormConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FinqaSession, JsValue> {
        let config = match config_json {
            Some(json) => Self::parse_config(&json).map_err(|e| JsValue::from_str(&e))?,
            None => FormConfig::default(),
        };
        Ok(Self::with_config(config))
    }

    /// Callback signature: (message: string) => boolean
    #[wasm_bindgen(js_name = setConfirmCallback)]
    pub fn set_confirm_callback(&mut self, callback: js_sys::Function) {
        self.confirm_callback = Some(callback);
    }

    /// Callback signature: (message: string) => void
    #[wasm_bindgen(js_name = setAlertCallback)]
    pub fn set_alert_callback(&mut self, callback: js_sys::Function) {
        self.alert_callback = Some(callback);
    }

    /// Called once the form has been cleared after a submission
    #[wasm_bindgen(js_name = setResetCallback)]
    pub fn set_reset_callback(&mut self, callback: js_sys::Function) {
        self.reset_callback = Some(callback);
    }

    #[wasm_bindgen(js_name = setPrompt)]
    pub fn set_prompt(&mut self, value: &str) {
        self.core
            .borrow_mut()
            .form_mut()
            .set_field(ScalarField::Prompt, value);
    }

    #[wasm_bindgen(js_name = setAnswer)]
    pub fn set_answer(&mut self, value: &str) {
        self.core
            .borrow_mut()
            .form_mut()
            .set_field(ScalarField::Answer, value);
    }

    /// `field` is "fact" or "source"
    #[wasm_bindgen(js_name = setSupportingFact)]
    pub fn set_supporting_fact(
        &mut self,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), JsValue> {
        self.set_supporting_fact_internal(index, field, value)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// `field` is "secPageLink" or "datePublished"
    #[wasm_bindgen(js_name = setDocument)]
    pub fn set_document(&mut self, index: usize, field: &str, value: &str) -> Result<(), JsValue> {
        self.set_document_internal(index, field, value)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Attach the selected file to a document
    /// Returns the file field's error messages
    #[wasm_bindgen(js_name = setDocumentFile)]
    pub fn set_document_file(
        &mut self,
        index: usize,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Vec<String>, JsValue> {
        let file = FileAttachment::new(name, mime_type, bytes.to_vec());
        self.set_document_file_internal(index, Some(file))
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = clearDocumentFile)]
    pub fn clear_document_file(&mut self, index: usize) -> Result<(), JsValue> {
        self.set_document_file_internal(index, None)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Returns the index of the new entry
    #[wasm_bindgen(js_name = addSupportingFact)]
    pub fn add_supporting_fact(&mut self) -> usize {
        self.core.borrow_mut().form_mut().add_supporting_fact()
    }

    /// Returns the index of the new entry
    #[wasm_bindgen(js_name = addDocument)]
    pub fn add_document(&mut self) -> usize {
        self.core.borrow_mut().form_mut().add_document()
    }

    /// Asks for confirmation; returns false when declined
    #[wasm_bindgen(js_name = removeSupportingFact)]
    pub fn remove_supporting_fact(&mut self, index: usize) -> Result<bool, JsValue> {
        let mut dialogs = self.dialogs();
        self.remove_internal(Collection::SupportingFacts, index, &mut dialogs)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Asks for confirmation; returns false when declined
    #[wasm_bindgen(js_name = removeDocument)]
    pub fn remove_document(&mut self, index: usize) -> Result<bool, JsValue> {
        let mut dialogs = self.dialogs();
        self.remove_internal(Collection::Documents, index, &mut dialogs)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = canRemoveSupportingFact)]
    pub fn can_remove_supporting_fact(&self) -> bool {
        self.core
            .borrow()
            .form()
            .can_remove(Collection::SupportingFacts)
    }

    #[wasm_bindgen(js_name = canRemoveDocument)]
    pub fn can_remove_document(&self) -> bool {
        self.core.borrow().form().can_remove(Collection::Documents)
    }

    /// Run the submission gate
    ///
    /// Returns `{ status, message, submittedAt, completeAfterMs }`. On
    /// "submitted" the form is cleared after `completeAfterMs` unless
    /// `cancelSubmission` is called first.
    pub fn submit(&mut self) -> Result<JsValue, JsValue> {
        let mut dialogs = self.dialogs();
        let outcome = self
            .submit_internal(&mut dialogs)
            .map_err(|e| JsValue::from_str(&e))?;

        if let SubmitOutcome::Submitted { complete_after, .. } = &outcome {
            web_sys::console::log_1(&"Submission handed off".into());
            self.schedule_completion(*complete_after)?;
        }

        serde_wasm_bindgen::to_value(&SubmitResultJs::from(&outcome))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Abort a pending submission; the form keeps its contents
    #[wasm_bindgen(js_name = cancelSubmission)]
    pub fn cancel_submission(&mut self) -> Result<(), JsValue> {
        if let Some(handle) = self.pending_timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
        self.cancel_internal().map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.core.borrow().is_pending()
    }

    #[wasm_bindgen(js_name = submitLabel)]
    pub fn submit_label(&self) -> String {
        self.core.borrow().submit_label().to_string()
    }

    /// Error messages for a dotted field path such as "documents.0.secPageLink"
    #[wasm_bindgen(js_name = getErrors)]
    pub fn get_errors(&self, path: &str) -> Result<Vec<String>, JsValue> {
        self.errors_internal(path).map_err(|e| JsValue::from_str(&e))
    }

    /// Every field with errors, keyed by dotted path
    #[wasm_bindgen(js_name = getAllErrors)]
    pub fn get_all_errors(&self) -> Result<JsValue, JsValue> {
        let messages = self.core.borrow().form().errors().to_message_map();
        serde_wasm_bindgen::to_value(&messages)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Current values in submission shape, for re-rendering the form
    #[wasm_bindgen(js_name = getFormData)]
    pub fn get_form_data(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.payload())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl FinqaSession {
    pub fn with_config(config: FormConfig) -> Self {
        Self {
            core: Rc::new(RefCell::new(FormSession::new(config))),
            pending_timer: Rc::new(Cell::new(None)),
            confirm_callback: None,
            alert_callback: None,
            reset_callback: None,
        }
    }

    fn parse_config(json: &str) -> Result<FormConfig, String> {
        FormConfig::from_json(json).map_err(|e| e.to_string())
    }

    fn dialogs(&self) -> JsDialogs {
        JsDialogs::new(self.confirm_callback.clone(), self.alert_callback.clone())
    }

    fn payload(&self) -> SubmissionPayload {
        SubmissionPayload::from(self.core.borrow().form().data())
    }

    /// Internal method to set a fact field (testable without JsValue)
    fn set_supporting_fact_internal(
        &mut self,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), String> {
        let field =
            FactField::parse(field).ok_or_else(|| format!("Unknown supporting fact field: {}", field))?;
        self.core
            .borrow_mut()
            .form_mut()
            .set_supporting_fact(index, field, value)
            .map_err(|e| e.to_string())
    }

    fn set_document_internal(&mut self, index: usize, field: &str, value: &str) -> Result<(), String> {
        let field =
            DocumentField::parse(field).ok_or_else(|| format!("Unknown document field: {}", field))?;
        self.core
            .borrow_mut()
            .form_mut()
            .set_document(index, field, value)
            .map_err(|e| e.to_string())
    }

    fn set_document_file_internal(
        &mut self,
        index: usize,
        file: Option<FileAttachment>,
    ) -> Result<Vec<String>, String> {
        let mut core = self.core.borrow_mut();
        core.form_mut()
            .set_document_file(index, file)
            .map_err(|e| e.to_string())?;
        let path = FieldPath::document(index, DocumentField::File);
        Ok(core.form().errors().messages(&path))
    }

    fn remove_internal(
        &mut self,
        collection: Collection,
        index: usize,
        dialogs: &mut dyn Dialogs,
    ) -> Result<bool, String> {
        let mut core = self.core.borrow_mut();
        let form = core.form_mut();
        let removed = match collection {
            Collection::SupportingFacts => form.remove_supporting_fact(index, dialogs),
            Collection::Documents => form.remove_document(index, dialogs),
        };
        removed.map_err(|e| e.to_string())
    }

    fn submit_internal(&mut self, dialogs: &mut dyn Dialogs) -> Result<SubmitOutcome, String> {
        let mut sink = AcknowledgeSink::default();
        self.core
            .borrow_mut()
            .submit(dialogs, &mut sink)
            .map_err(|e| e.to_string())
    }

    fn complete_internal(&mut self) -> Result<(), String> {
        self.core
            .borrow_mut()
            .complete_submission()
            .map_err(|e| e.to_string())
    }

    fn cancel_internal(&mut self) -> Result<(), String> {
        self.core
            .borrow_mut()
            .cancel_submission()
            .map_err(|e| e.to_string())
    }

    fn errors_internal(&self, path: &str) -> Result<Vec<String>, String> {
        let path = FieldPath::from_str(path).map_err(|e| e.to_string())?;
        Ok(self.core.borrow().form().errors().messages(&path))
    }

    /// Clear the form after the simulated latency
    fn schedule_completion(&self, delay: Duration) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;

        let core = Rc::clone(&self.core);
        let pending_timer = Rc::clone(&self.pending_timer);
        let on_reset = self.reset_callback.clone();
        let complete = Closure::once_into_js(move || {
            pending_timer.set(None);
            let completed = core.borrow_mut().complete_submission();
            match completed {
                Ok(()) => {
                    if let Some(callback) = on_reset {
                        let _ = callback.call0(&JsValue::NULL);
                    }
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("Submission not completed: {}", e).into());
                }
            }
        });

        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            complete.unchecked_ref(),
            delay.as_millis().min(i32::MAX as u128) as i32,
        )?;
        self.pending_timer.set(Some(handle));
        Ok(())
    }
}
