//! # Retry Policy
//!
//! Exponential backoff for transient transport failures.
//!
//! The policy is shared configuration; every request takes its own
//! `RetryContext`, so one call exhausting its retries never shortens the
//! budget of the next.

use reqwest::Method;
use std::time::Duration;

/// Backoff parameters for transport retries
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (default: 3)
    pub max_retries: u32,
    /// Delay before the first retry (default: 1s)
    pub initial_delay: Duration,
    /// Growth factor between consecutive delays (default: 2.0)
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            ..Self::default()
        }
    }

    /// A policy that never retries
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Fresh backoff state for a single request
    pub fn context(&self) -> RetryContext {
        RetryContext {
            remaining: self.max_retries,
            next: self.initial_delay,
            multiplier: self.multiplier,
            attempt: 0,
        }
    }
}

/// Backoff state owned by one request
#[derive(Debug, Clone)]
pub struct RetryContext {
    remaining: u32,
    next: Duration,
    multiplier: f64,
    attempt: u32,
}

impl RetryContext {
    /// Delay to wait before the next retry, or `None` once the budget is spent
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.attempt += 1;

        let delay = self.next;
        self.next = delay.mul_f64(self.multiplier);
        Some(delay)
    }

    /// Retries handed out so far
    pub fn retries_used(&self) -> u32 {
        self.attempt
    }
}

/// GET, PUT and DELETE may be repeated without changing the outcome
pub fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::PUT | Method::DELETE | Method::HEAD)
}

/// Decide whether a transport failure is worth another attempt.
///
/// A connect failure means the request never reached the server, so it is
/// safe to repeat for any method. A timeout may have been processed
/// server-side and is only repeated for idempotent methods. Everything else
/// (TLS, body decoding, redirects) is surfaced immediately.
pub fn is_transient(error: &reqwest::Error, idempotent: bool) -> bool {
    if error.is_connect() {
        return true;
    }
    error.is_timeout() && idempotent
}
