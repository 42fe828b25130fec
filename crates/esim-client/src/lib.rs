//! # esim-client
//!
//! Client for the eSIM storefront API.
//!
//! This crate provides:
//! - **ApiClient** - reqwest wrapper with request stamping, retries and 401 handling
//! - **PaymentApi / AdminApi** - one method per backend endpoint
//! - **SessionStore** - the admin session, persisted through `SessionStorage`
//! - **AuthService** - admin sign-in and sign-out
//! - **CheckoutController** - submission, QR polling and redirects
//! - **StatusPoller** - cancellable payment status polling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use esim_client::{ClientConfig, Storefront, Submission, ViewScope};
//! use esim_core::{CheckoutForm, MemoryNavigator, PaymentMethod};
//!
//! let config = ClientConfig::from_env()?;
//! let storefront = Storefront::with_file_session(config, Arc::new(MemoryNavigator::new()))?;
//!
//! let plans = storefront.payments.get_plans().await?;
//! let plan = plans.get("esim_1gb_7days").unwrap();
//!
//! let scope = ViewScope::new();
//! let form = CheckoutForm::new(PaymentMethod::Mmqr, &plan.id);
//! if let Submission::AwaitingQr { transaction_id, .. } =
//!     storefront.checkout.submit(&form, plan, scope.token()).await?
//! {
//!     storefront.checkout.await_qr_payment(&transaction_id, scope.token()).await?;
//! }
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod contact;
pub mod http;
pub mod poller;
pub mod retry;
pub mod session;
pub mod storage;
pub mod storefront;

// Re-exports
pub use admin::AdminConsole;
pub use api::{AdminApi, PaymentApi};
pub use auth::AuthService;
pub use checkout::{
    CheckoutController, Submission, ViewScope, NOT_COMPLETED_MESSAGE, PAYMENT_FAILED_MESSAGE,
    PROCESSING_FAILED_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
pub use config::ClientConfig;
pub use contact::submit_contact;
pub use http::ApiClient;
pub use poller::{PollOutcome, PollSettings, StatusPoller};
pub use retry::{RetryContext, RetryPolicy};
pub use session::{Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, AUTH_TOKEN_KEY, AUTH_USER_KEY};
pub use storefront::Storefront;

// Token type accepted by checkout and polling
pub use tokio_util::sync::CancellationToken;
