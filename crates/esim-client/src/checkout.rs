//! # Checkout Controller
//!
//! Drives one payment from form submission to its outcome.
//!
//! | Method flow   | After the order is accepted                                   |
//! |---------------|---------------------------------------------------------------|
//! | Synchronous   | wait `success_redirect_delay`, go to the success page          |
//! | QR code       | hand back the QR; `await_qr_payment` polls until it settles    |
//! | Redirect      | navigate to the provider URL                                   |
//!
//! Polling and the success delay are tied to a `CancellationToken`; a
//! `ViewScope` cancels it when the owning view goes away.

use crate::poller::{PollOutcome, StatusPoller};
use esim_core::{
    CheckoutForm, CheckoutState, Navigation, PaymentDetails, PaymentFlow, PaymentRequest, Plan,
    Route, SharedNavigator, SharedPaymentBackend, StorefrontError, StorefrontResult, Validate,
    ValidationErrors,
};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Shown when the server declined without saying why
pub const PAYMENT_FAILED_MESSAGE: &str = "Payment failed";
/// Shown when the payment request itself failed
pub const PROCESSING_FAILED_MESSAGE: &str = "Payment processing failed. Please try again.";
/// Shown when a QR payment settles in a non-success status
pub const NOT_COMPLETED_MESSAGE: &str = "Payment was not completed successfully";
/// Shown when a QR payment never settles
pub const SESSION_EXPIRED_MESSAGE: &str = "Payment session expired. Please try again.";

/// What `submit` achieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Synchronous payment accepted; the success page follows unless the
    /// view closed during the delay
    Completed { transaction_id: String },
    /// Waiting for the customer to scan the QR code
    AwaitingQr {
        transaction_id: String,
        qr_code_url: String,
        expires_in: Option<Duration>,
    },
    /// The customer was sent to the provider's page
    Redirected { url: String },
}

/// Owns the cancellation token for one view; dropping it cancels
/// everything started under it.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

pub struct CheckoutController {
    backend: SharedPaymentBackend,
    navigator: SharedNavigator,
    poller: StatusPoller,
    redirect_delay: Duration,
    state: Mutex<CheckoutState>,
}

impl CheckoutController {
    pub fn new(
        backend: SharedPaymentBackend,
        navigator: SharedNavigator,
        poller: StatusPoller,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            backend,
            navigator,
            poller,
            redirect_delay,
            state: Mutex::new(CheckoutState::Idle),
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.lock().clone()
    }

    /// Back to `Idle`, e.g. when the customer picks another method
    pub fn reset(&self) {
        *self.lock() = CheckoutState::Idle;
    }

    /// Submit the checkout form for `plan`.
    ///
    /// Invalid input returns `Validation` before anything is sent and leaves
    /// the state untouched. A failed request is not retried.
    #[instrument(skip_all, fields(plan = %plan.id, method = %form.payment_method))]
    pub async fn submit(
        &self,
        form: &CheckoutForm,
        plan: &Plan,
        cancel: &CancellationToken,
    ) -> StorefrontResult<Submission> {
        form.validate()?;
        if form.esim_plan_id != plan.id {
            let mut errors = ValidationErrors::new();
            errors.add("esim_plan_id", "Selected plan is not available");
            return Err(errors.into());
        }

        {
            let mut state = self.lock();
            if state.is_busy() {
                return Err(StorefrontError::Rejected {
                    message: "A payment is already being processed".to_string(),
                });
            }
            state.begin();
        }

        let request = PaymentRequest::from_form(form, plan);
        let response = match self.backend.create_payment(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Payment request failed");
                self.lock().fail(e.user_message(PROCESSING_FAILED_MESSAGE));
                return Err(e);
            }
        };

        if !response.success {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| PAYMENT_FAILED_MESSAGE.to_string());
            warn!(%message, "Payment declined");
            return Err(self.fail(message));
        }

        // Accepted: what follows depends on the method
        self.lock().succeed();

        match form.payment_method.flow() {
            PaymentFlow::Synchronous => {
                let transaction_id = self.require(response.transaction_id, "transaction id")?;
                info!(%transaction_id, "Payment accepted");

                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!(%transaction_id, "View closed before the success page");
                        return Ok(Submission::Completed { transaction_id });
                    }
                    _ = tokio::time::sleep(self.redirect_delay) => {}
                }

                self.navigator.navigate(
                    Route::PaymentSuccess {
                        transaction_id: transaction_id.clone(),
                    }
                    .into(),
                );
                Ok(Submission::Completed { transaction_id })
            }
            PaymentFlow::QrCode => {
                let transaction_id = self.require(response.transaction_id, "transaction id")?;
                let qr_code_url = self.require(response.qr_code_url, "QR code")?;
                info!(%transaction_id, "Awaiting QR payment");

                Ok(Submission::AwaitingQr {
                    transaction_id,
                    qr_code_url,
                    expires_in: response.qr_expires_in.map(Duration::from_secs),
                })
            }
            PaymentFlow::Redirect => {
                let url = self.require(response.redirect_url, "redirect URL")?;
                info!(%url, "Redirecting to payment provider");

                self.navigator.navigate(Navigation::External(url.clone()));
                Ok(Submission::Redirected { url })
            }
        }
    }

    /// Poll a QR payment to its end.
    ///
    /// Completion shows the success page. A failed or expired payment moves
    /// the state to `Error`; cancellation leaves it untouched.
    #[instrument(skip(self, cancel))]
    pub async fn await_qr_payment(
        &self,
        transaction_id: &str,
        cancel: &CancellationToken,
    ) -> StorefrontResult<PaymentDetails> {
        match self.poller.poll(transaction_id, cancel).await {
            PollOutcome::Completed(details) => {
                self.lock().succeed();
                self.navigator.navigate(
                    Route::PaymentSuccess {
                        transaction_id: transaction_id.to_string(),
                    }
                    .into(),
                );
                Ok(details)
            }
            PollOutcome::Failed(status) => {
                warn!(%status, "QR payment not completed");
                Err(self.fail(NOT_COMPLETED_MESSAGE))
            }
            PollOutcome::TimedOut => Err(self.fail(SESSION_EXPIRED_MESSAGE)),
            PollOutcome::Cancelled => Err(StorefrontError::Cancelled),
        }
    }

    fn require(&self, value: Option<String>, what: &str) -> StorefrontResult<String> {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(value) => Ok(value),
            None => {
                error!("Payment response is missing the {}", what);
                Err(self.fail(PROCESSING_FAILED_MESSAGE))
            }
        }
    }

    fn fail(&self, message: impl Into<String>) -> StorefrontError {
        let message = message.into();
        self.lock().fail(message.clone());
        StorefrontError::Rejected { message }
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
