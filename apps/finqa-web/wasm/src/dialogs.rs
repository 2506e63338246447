//! Confirm/alert bridge to JavaScript
//!
//! Uses the page's callbacks when set, otherwise the browser's native
//! `window.confirm` and `window.alert`.

use finqa_core::{ConfirmRequest, Dialogs};
use wasm_bindgen::prelude::*;

#[derive(Default, Clone)]
pub struct JsDialogs {
    confirm: Option<js_sys::Function>,
    alert: Option<js_sys::Function>,
}

impl JsDialogs {
    pub fn new(confirm: Option<js_sys::Function>, alert: Option<js_sys::Function>) -> Self {
        Self { confirm, alert }
    }
}

impl Dialogs for JsDialogs {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        let message = request.message();
        match &self.confirm {
            // Callback signature: (message: string) => boolean
            Some(callback) => callback
                .call1(&JsValue::NULL, &JsValue::from_str(message))
                .map(|answer| answer.as_bool().unwrap_or(false))
                .unwrap_or(false),
            None => web_sys::window()
                .and_then(|w| w.confirm_with_message(message).ok())
                .unwrap_or(false),
        }
    }

    fn alert(&mut self, message: &str) {
        match &self.alert {
            Some(callback) => {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(message));
            }
            None => {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(message);
                }
            }
        }
    }
}
