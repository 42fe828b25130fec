//! # API Client
//!
//! Thin wrapper over `reqwest::Client` that every API call goes through.
//!
//! Per request it:
//! - stamps `X-Timestamp` (RFC 3339, millisecond precision, UTC) and
//!   `X-Request-Id` (UUID v4)
//! - attaches `Authorization: Bearer <token>` while a session exists
//! - retries transient transport failures with a fresh backoff context
//! - on 401 clears the session and sends admin pages back to the login page
//! - maps error bodies (`detail` / `message`) to `StorefrontError`

use crate::config::ClientConfig;
use crate::retry::{self, RetryPolicy};
use crate::session::SessionStore;
use chrono::{SecondsFormat, Utc};
use esim_core::{Route, SharedNavigator, StorefrontError, StorefrontResult};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub const TIMESTAMP_HEADER: &str = "X-Timestamp";
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct ApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    session: Arc<SessionStore>,
    navigator: SharedNavigator,
}

impl ApiClient {
    /// Create a client; fails only if the TLS backend cannot be initialised
    pub fn new(
        config: &ClientConfig,
        session: Arc<SessionStore>,
        navigator: SharedNavigator,
    ) -> StorefrontResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                StorefrontError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            retry: config.retry.clone(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &SharedNavigator {
        &self.navigator
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> StorefrontResult<T> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> StorefrontResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> StorefrontResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> StorefrontResult<T> {
        self.execute(Method::DELETE, path, None).await
    }

    #[instrument(skip(self, body), fields(request_id = tracing::field::Empty))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> StorefrontResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let idempotent = retry::is_idempotent(&method);
        let mut backoff = self.retry.context();

        info!("API request: {} {}", method, path);

        let response = loop {
            let request = self.build_request(&method, &url, &request_id, body.as_ref());
            match request.send().await {
                Ok(response) => break response,
                Err(e) if retry::is_transient(&e, idempotent) => match backoff.next_delay() {
                    Some(delay) => {
                        warn!(
                            attempt = backoff.retries_used(),
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Network issue, retrying {} {}",
                            method,
                            path
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        error!(error = %e, "API request failed after retries: {} {}", method, path);
                        return Err(StorefrontError::Network(e.to_string()));
                    }
                },
                Err(e) => {
                    error!(error = %e, "API request failed: {} {}", method, path);
                    return Err(StorefrontError::Network(e.to_string()));
                }
            }
        };

        self.handle_response(&method, path, response).await
    }

    fn build_request(
        &self,
        method: &Method,
        url: &str,
        request_id: &str,
        body: Option<&Value>,
    ) -> RequestBuilder {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(TIMESTAMP_HEADER, timestamp)
            .header(REQUEST_ID_HEADER, request_id);

        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        response: Response,
    ) -> StorefrontResult<T> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("API response: 401 {} {}", method, path);
            self.handle_unauthorized();
            return Err(StorefrontError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .map_err(|e| StorefrontError::Network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                "API error: {} {} {}",
                status.as_u16(),
                method,
                path
            );
            return Err(error_from_body(status, &body));
        }

        info!("API response: {} {} {}", status.as_u16(), method, path);
        debug!(bytes = body.len(), "Response body received");

        serde_json::from_str(&body).map_err(|e| {
            StorefrontError::Serialization(format!("unexpected response from {}: {}", path, e))
        })
    }

    fn handle_unauthorized(&self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear stored session after 401");
        }

        let current = self.navigator.current_route();
        if current.should_redirect_to_login() {
            info!(from = %current, "Session expired, redirecting to admin login");
            self.navigator.navigate(Route::AdminLogin.into());
        }
    }
}

/// Map a non-2xx body to an error.
///
/// Bodies carrying `detail` (string or validation list) or `message` become
/// `Rejected` with that text; anything else becomes `Http`.
fn error_from_body(status: StatusCode, body: &str) -> StorefrontError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed.as_ref().and_then(|json| {
        let detail = match json.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        };
        detail.or_else(|| json.get("message").and_then(Value::as_str).map(String::from))
    });

    match message {
        Some(message) if !message.trim().is_empty() => StorefrontError::Rejected { message },
        _ => StorefrontError::Http {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        },
    }
}
