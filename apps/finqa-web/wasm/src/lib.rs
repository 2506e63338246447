//! WASM bindings for the finance Q/A annotation form
//!
//! Form state, validation and the submission gate all live in Rust. The
//! page only renders inputs, forwards edits and shows the messages this
//! module hands back.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { FinqaSession, autosizeTextarea } from './pkg/finqa_wasm.js';
//!
//! await init();
//!
//! const session = new FinqaSession();
//! session.setResetCallback(() => renderForm(session.getFormData()));
//!
//! promptInput.addEventListener('input', (e) => {
//!     session.setPrompt(e.target.value);
//!     autosizeTextarea(e.target);
//!     showErrors('prompt', session.getErrors('prompt'));
//! });
//!
//! submitButton.addEventListener('click', () => {
//!     const result = session.submit();
//!     submitButton.disabled = session.isPending();
//!     submitButton.textContent = session.submitLabel();
//! });
//! ```

pub mod dialogs;
pub mod session;

use finqa_core::INSTRUCTIONS;
use wasm_bindgen::prelude::*;

pub use session::FinqaSession;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"FinQA WASM initialized".into());
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Validate a single field value without a session
/// Returns an array of `{ kind, message }`
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(field: &str, value: &str) -> Result<JsValue, JsValue> {
    let errors = finqa_core::validate_field(field, value);
    serde_wasm_bindgen::to_value(&errors)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Structured instructions content for the page header
#[wasm_bindgen(js_name = getInstructions)]
pub fn get_instructions() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&INSTRUCTIONS)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen(js_name = getInstructionsText)]
pub fn get_instructions_text() -> String {
    INSTRUCTIONS.render_text()
}

/// Grow a textarea to fit its content
#[wasm_bindgen(js_name = autosizeTextarea)]
pub fn autosize_textarea(element: &web_sys::HtmlTextAreaElement) -> Result<(), JsValue> {
    let style = element.style();
    style.set_property("height", "auto")?;
    let height = element.scroll_height();
    style.set_property("height", &format!("{}px", height))?;
    Ok(())
}


#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validate_field_returns_errors() {
        let errors = validate_field("prompt", "short").unwrap();
        let errors = js_sys::Array::from(&errors);
        assert_eq!(errors.length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_autosize_sets_pixel_height() {
        let document = web_sys::window().unwrap().document().unwrap();
        let textarea: web_sys::HtmlTextAreaElement = document
            .create_element("textarea")
            .unwrap()
            .dyn_into()
            .unwrap();
        document.body().unwrap().append_child(&textarea).unwrap();
        textarea.set_value("line one\nline two\nline three\nline four");

        autosize_textarea(&textarea).unwrap();
        let height = textarea.style().get_property_value("height").unwrap();
        assert!(height.ends_with("px"));
    }
}
