//! # esim-core
//!
//! Core types and traits for the eSIM storefront client.
//!
//! This crate provides:
//! - `Plan` and `PlanCatalog` plus `format_currency` for plan display
//! - `PaymentMethod`, `PaymentStatus`, `CheckoutForm` and the payment wire types
//! - `ContactForm` and the admin dashboard / gateway configuration types
//! - `Validate` and `ValidationErrors` for client-side form checks
//! - `Route`, `Navigation` and the `Navigator` trait for page transitions
//! - `PaymentBackend` trait consumed by the checkout controller
//! - `StorefrontError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use esim_core::{CheckoutForm, PaymentMethod, PaymentRequest, Validate};
//!
//! let form = CheckoutForm::new(PaymentMethod::Mmqr, "esim_1gb_7days");
//! form.validate()?;
//!
//! let plan = catalog.get("esim_1gb_7days").unwrap();
//! let request = PaymentRequest::from_form(&form, plan);
//! let response = backend.create_payment(&request).await?;
//! ```

pub mod admin;
pub mod backend;
pub mod checkout;
pub mod contact;
pub mod error;
pub mod navigator;
pub mod payment;
pub mod plan;
pub mod route;
mod timestamp;
pub mod validation;

// Re-exports for convenience
pub use admin::{
    AdminUser, DashboardData, DashboardStatistics, GatewayConfig, GatewayConfigUpdate,
    GatewayEnvironment, LoginCredentials, LoginResponse, TransactionRecord, UpdateConfigResponse,
    ADMIN_ROLE,
};
pub use backend::{PaymentBackend, SharedPaymentBackend};
pub use checkout::CheckoutState;
pub use contact::{ContactForm, ContactResponse};
pub use error::{StorefrontError, StorefrontResult};
pub use navigator::{MemoryNavigator, Navigator, SharedNavigator};
pub use payment::{
    CardDetails, CheckoutForm, CreatePaymentResponse, MmqrDetails, PaymentDetails, PaymentFlow,
    PaymentMethod, PaymentRequest, PaymentStatus,
};
pub use plan::{format_currency, fraction_digits, Plan, PlanCatalog};
pub use route::{Navigation, Route};
pub use validation::{is_valid_email, is_valid_myanmar_phone, Validate, ValidationErrors};
