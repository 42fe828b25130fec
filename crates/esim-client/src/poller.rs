//! # Payment Status Poller
//!
//! Watches a QR payment until the backend reports a terminal status.
//!
//! ```text
//!  start ──interval──▶ check ──interval──▶ check ──▶ ... ──▶ terminal status
//!    │                                                          │
//!    └──────────────── max_duration ───────────▶ TimedOut       ├─▶ Completed
//!                                                               └─▶ Failed
//!  cancel token fires at any point ─────────────▶ Cancelled
//! ```
//!
//! Checks never overlap: the next interval starts only after the previous
//! check returned. A failed check is logged and the next one still runs.

use esim_core::{PaymentDetails, PaymentStatus, SharedPaymentBackend};
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause before each status check (default: 3s)
    pub interval: Duration,
    /// Give up this long after polling started (default: 10 min)
    pub max_duration: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_duration: Duration::from_secs(600),
        }
    }
}

/// How polling ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed(PaymentDetails),
    /// Terminal but unsuccessful (FAILED, CANCELLED or REFUNDED)
    Failed(PaymentStatus),
    TimedOut,
    Cancelled,
}

#[derive(Clone)]
pub struct StatusPoller {
    backend: SharedPaymentBackend,
    settings: PollSettings,
}

impl StatusPoller {
    pub fn new(backend: SharedPaymentBackend, settings: PollSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    #[instrument(skip(self, cancel))]
    pub async fn poll(&self, transaction_id: &str, cancel: &CancellationToken) -> PollOutcome {
        let deadline = match Instant::now().checked_add(self.settings.max_duration) {
            Some(deadline) => deadline,
            None => {
                let fallback = PollSettings::default().max_duration;
                warn!(
                    max_secs = self.settings.max_duration.as_secs(),
                    fallback_secs = fallback.as_secs(),
                    "Poll limit out of range, using default"
                );
                Instant::now() + fallback
            }
        };
        let mut checks = 0u32;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(checks),
                _ = sleep_until(deadline) => return self.timed_out(checks),
                _ = sleep(self.settings.interval) => {}
            }

            checks += 1;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(checks),
                _ = sleep_until(deadline) => return self.timed_out(checks),
                result = self.backend.payment_status(transaction_id) => result,
            };

            match result {
                Ok(details) if details.status.is_success() => {
                    info!(checks, "Payment completed");
                    return PollOutcome::Completed(details);
                }
                Ok(details) if details.status.is_terminal() => {
                    info!(checks, status = %details.status, "Payment ended unsuccessfully");
                    return PollOutcome::Failed(details.status);
                }
                Ok(details) => debug!(checks, status = %details.status, "Payment still open"),
                Err(e) => warn!(checks, error = %e, "Status check failed, will retry"),
            }
        }
    }

    fn cancelled(&self, checks: u32) -> PollOutcome {
        debug!(checks, "Polling cancelled");
        PollOutcome::Cancelled
    }

    fn timed_out(&self, checks: u32) -> PollOutcome {
        warn!(
            checks,
            max_secs = self.settings.max_duration.as_secs(),
            "Gave up waiting for payment"
        );
        PollOutcome::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use esim_core::{
        CreatePaymentResponse, PaymentBackend, PaymentMethod, PaymentRequest, StorefrontError,
        StorefrontResult,
    };
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays scripted status results; the last one repeats forever
    struct ScriptedBackend {
        script: Mutex<VecDeque<StorefrontResult<PaymentStatus>>>,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<StorefrontResult<PaymentStatus>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentBackend for ScriptedBackend {
        async fn create_payment(
            &self,
            _request: &PaymentRequest,
        ) -> StorefrontResult<CreatePaymentResponse> {
            unreachable!("poller never creates payments")
        }

        async fn payment_status(&self, transaction_id: &str) -> StorefrontResult<PaymentDetails> {
            self.calls.lock().unwrap().push(Instant::now());
            let next = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.pop_front().unwrap()
                } else {
                    match script.front().unwrap() {
                        Ok(status) => Ok(*status),
                        Err(_) => Err(StorefrontError::Network("still down".into())),
                    }
                }
            };
            next.map(|status| PaymentDetails {
                transaction_id: transaction_id.to_string(),
                status,
                amount: 15000.0,
                currency: "MMK".to_string(),
                payment_method: PaymentMethod::Mmqr,
                created_at: Utc::now(),
                updated_at: None,
            })
        }
    }

    fn poller(backend: Arc<ScriptedBackend>) -> StatusPoller {
        StatusPoller::new(backend, PollSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_on_third_check() {
        let backend = ScriptedBackend::new(vec![
            Ok(PaymentStatus::Pending),
            Ok(PaymentStatus::Processing),
            Ok(PaymentStatus::Completed),
        ]);
        let started = Instant::now();

        let outcome = poller(backend.clone())
            .poll("ESIM_1", &CancellationToken::new())
            .await;

        assert!(matches!(outcome, PollOutcome::Completed(ref d) if d.transaction_id == "ESIM_1"));
        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0] - started, Duration::from_secs(3));
        assert_eq!(calls[2] - started, Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_polling() {
        let backend = ScriptedBackend::new(vec![
            Err(StorefrontError::Network("reset".into())),
            Ok(PaymentStatus::Cancelled),
        ]);

        let outcome = poller(backend.clone())
            .poll("ESIM_1", &CancellationToken::new())
            .await;

        assert_eq!(outcome, PollOutcome::Failed(PaymentStatus::Cancelled));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_max_duration() {
        let backend = ScriptedBackend::new(vec![Ok(PaymentStatus::Pending)]);
        let started = Instant::now();

        let outcome = poller(backend.clone())
            .poll("ESIM_1", &CancellationToken::new())
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(Instant::now() - started, Duration::from_secs(600));
        assert!(backend.calls().len() <= 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_limit_uses_default() {
        let backend = ScriptedBackend::new(vec![Ok(PaymentStatus::Pending)]);
        let settings = PollSettings {
            interval: Duration::from_secs(3),
            max_duration: Duration::from_secs(u64::MAX),
        };
        let started = Instant::now();

        let outcome = StatusPoller::new(backend, settings)
            .poll("ESIM_1", &CancellationToken::new())
            .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(Instant::now() - started, Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_checks() {
        let backend = ScriptedBackend::new(vec![Ok(PaymentStatus::Pending)]);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(7)).await;
            canceller.cancel();
        });

        let outcome = poller(backend.clone()).poll("ESIM_1", &cancel).await;

        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_makes_no_calls() {
        let backend = ScriptedBackend::new(vec![Ok(PaymentStatus::Completed)]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            poller(backend.clone()).poll("ESIM_1", &cancel).await,
            PollOutcome::Cancelled
        );
        assert!(backend.calls().is_empty());
    }
}
