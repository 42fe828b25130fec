//! # API Façade
//!
//! One method per backend endpoint. Each performs a single request through
//! `ApiClient` and returns the decoded body; workflow logic lives elsewhere.

pub mod admin;
pub mod payments;

pub use admin::AdminApi;
pub use payments::PaymentApi;
