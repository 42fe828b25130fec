//! # Form Validation
//!
//! Client-side checks run before anything is sent to the API.
//! A form that fails validation never produces a network call.

use serde::Serialize;
use std::fmt;

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered collection of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record an error when `condition` does not hold
    pub fn check(&mut self, condition: bool, field: &'static str, message: &str) {
        if !condition {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message recorded for `field`
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Merge errors from a nested form, keeping order
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by every user-facing form
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Loose `local@domain.tld` check, no whitespace allowed
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Myanmar mobile (`09xxxxxxxx`) or landline number, with or without the
/// `+95` / `95` / `0` prefix. Spaces, dashes and parentheses are ignored.
pub fn is_valid_myanmar_phone(phone: &str) -> bool {
    let clean: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '-'))
        .collect();

    let national = ["+95", "95", "0"]
        .iter()
        .find_map(|prefix| clean.strip_prefix(prefix))
        .unwrap_or(&clean);

    is_mobile(national) || is_mobile(&clean) || is_landline(national) || is_landline(&clean)
}

fn is_mobile(digits: &str) -> bool {
    digits.starts_with('9')
        && digits.chars().all(|c| c.is_ascii_digit())
        && (9..=10).contains(&digits.len())
}

fn is_landline(digits: &str) -> bool {
    digits.chars().next().is_some_and(|c| ('1'..='9').contains(&c))
        && digits.chars().all(|c| c.is_ascii_digit())
        && (7..=8).contains(&digits.len())
}

/// Character count rather than byte length, so Burmese text is measured fairly
pub(crate) fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}
