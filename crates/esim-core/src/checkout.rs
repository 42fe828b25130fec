//! # Checkout State
//!
//! Lifecycle of a single checkout attempt as shown on the payment page.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    /// Request in flight or waiting for the customer to pay
    Processing,
    Success,
    /// Failed with a message fit for display
    Error(String),
}

impl CheckoutState {
    /// Enter `Processing`; any previous error is discarded
    pub fn begin(&mut self) {
        *self = CheckoutState::Processing;
    }

    pub fn succeed(&mut self) {
        *self = CheckoutState::Success;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = CheckoutState::Error(message.into());
    }

    /// While busy, the submit control is disabled
    pub fn is_busy(&self) -> bool {
        matches!(self, CheckoutState::Processing)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            CheckoutState::Error(message) => Some(message),
            _ => None,
        }
    }
}
