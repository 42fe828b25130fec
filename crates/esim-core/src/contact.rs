//! # Contact Form
//!
//! Payload for `POST /contact`.

use crate::validation::{char_len, is_valid_email, Validate, ValidationErrors};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl Validate for ContactForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            char_len(&self.name) >= 2,
            "name",
            "Name must be at least 2 characters",
        );
        errors.check(
            is_valid_email(self.email.trim()),
            "email",
            "Please enter a valid email address",
        );
        errors.check(
            char_len(&self.subject) >= 5,
            "subject",
            "Subject must be at least 5 characters",
        );
        errors.check(
            char_len(&self.message) >= 10,
            "message",
            "Message must be at least 10 characters",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
