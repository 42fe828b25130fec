//! # esim-wasm
//!
//! WebAssembly bindings for the storefront's pure helpers, so the browser
//! shows the same prices and validation messages as the terminal client.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { format_currency, validate_contact_form } from 'esim-wasm';
//!
//! await init();
//!
//! format_currency(15000, 'MMK');            // "MMK 15,000"
//! const errors = validate_contact_form(form); // [{ field, message }, ...]
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use esim_core::validation::FieldError;
use esim_core::{ContactForm, LoginCredentials, PaymentMethod, PaymentStatus, Validate};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// Format an amount for display, e.g. `MMK 15,000`
#[wasm_bindgen]
pub fn format_currency(amount: f64, currency: &str) -> String {
    esim_core::format_currency(amount, currency)
}

/// Display name for a payment method code such as `UABPAY`
#[wasm_bindgen]
pub fn payment_method_name(code: &str) -> Option<String> {
    code.parse::<PaymentMethod>()
        .ok()
        .map(|method| method.display_name().to_string())
}

/// True once a payment status can no longer change; unknown codes are not terminal
#[wasm_bindgen]
pub fn is_terminal_status(status: &str) -> bool {
    status
        .parse::<PaymentStatus>()
        .map(|status| status.is_terminal())
        .unwrap_or(false)
}

/// Validate a contact form object.
///
/// Returns an array of `{ field, message }`; empty when the form is valid.
#[wasm_bindgen]
pub fn validate_contact_form(form: JsValue) -> Result<JsValue, JsValue> {
    validate_value::<ContactForm>(form, "contact form")
}

/// Validate `{ email, password }` before signing in
#[wasm_bindgen]
pub fn validate_login(credentials: JsValue) -> Result<JsValue, JsValue> {
    validate_value::<LoginCredentials>(credentials, "login")
}

#[wasm_bindgen]
pub fn is_valid_myanmar_phone(phone: &str) -> bool {
    esim_core::is_valid_myanmar_phone(phone)
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn validate_value<T>(value: JsValue, what: &str) -> Result<JsValue, JsValue>
where
    T: DeserializeOwned + Validate,
{
    let form: T = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))?;

    serde_wasm_bindgen::to_value(&field_errors(&form))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn field_errors(form: &impl Validate) -> Vec<FieldError> {
    match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().cloned().collect(),
    }
}
