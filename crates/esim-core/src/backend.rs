//! # Payment Backend Trait
//!
//! The seam between checkout orchestration and the transport that talks to
//! the payments API.
//!
//! ```text
//! ┌──────────────────────┐      ┌─────────────────────────────┐
//! │ CheckoutController   │─────▶│ PaymentBackend (trait)      │
//! │ StatusPoller         │      │  ├── create_payment()       │
//! └──────────────────────┘      │  └── payment_status()       │
//!                               └─────────────────────────────┘
//!                                              ▲
//!                              ┌───────────────┴───────────────┐
//!                              │                               │
//!                      ┌───────┴───────┐               ┌───────┴───────┐
//!                      │  PaymentApi   │               │ test doubles  │
//!                      │   (reqwest)   │               │               │
//!                      └───────────────┘               └───────────────┘
//! ```

use crate::error::StorefrontResult;
use crate::payment::{CreatePaymentResponse, PaymentDetails, PaymentRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Payment operations the checkout flow depends on.
#[async_trait]
pub trait PaymentBackend: Send + Sync {
    /// Submit a payment order.
    ///
    /// A response with `success == false` is returned as `Ok`; callers decide
    /// how to surface the server's message.
    async fn create_payment(&self, request: &PaymentRequest)
        -> StorefrontResult<CreatePaymentResponse>;

    /// Fetch the current status of a transaction.
    async fn payment_status(&self, transaction_id: &str) -> StorefrontResult<PaymentDetails>;

    /// Name used in log lines.
    fn backend_name(&self) -> &'static str {
        "payments-api"
    }
}

/// Type alias for a shared payment backend (dynamic dispatch)
pub type SharedPaymentBackend = Arc<dyn PaymentBackend>;
