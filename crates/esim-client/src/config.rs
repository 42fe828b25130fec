//! # Client Configuration
//!
//! Settings for the storefront API client, loaded from environment variables
//! (with `.env` support) or from a TOML file.

use crate::poller::PollSettings;
use crate::retry::RetryPolicy;
use esim_core::StorefrontError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SESSION_FILE: &str = ".esim-session.json";
/// Upper bound for every duration setting
pub const MAX_DURATION_SETTING: Duration = Duration::from_secs(24 * 60 * 60);

/// Storefront client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without trailing slash (e.g. `https://api.esim.com.mm/api`)
    pub api_base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Transport retry policy
    pub retry: RetryPolicy,

    /// QR payment status polling
    pub poll: PollSettings,

    /// Pause between a synchronous payment success and the success page
    pub success_redirect_delay: Duration,

    /// Where the admin session is persisted between runs
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            poll: PollSettings::default(),
            success_redirect_delay: Duration::from_secs(2),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

/// Keys accepted in a TOML config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    http_timeout_secs: Option<u64>,
    session_file: Option<PathBuf>,
    poll_interval_secs: Option<u64>,
    poll_max_secs: Option<u64>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognised vars (all optional):
    /// - `ESIM_API_BASE_URL`
    /// - `ESIM_HTTP_TIMEOUT_SECS`
    /// - `ESIM_SESSION_FILE`
    /// - `ESIM_POLL_INTERVAL_SECS`
    /// - `ESIM_POLL_MAX_SECS`
    pub fn from_env() -> Result<Self, StorefrontError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorefrontError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str| -> Result<Option<u64>, StorefrontError> {
            match lookup(key) {
                None => Ok(None),
                Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
                    StorefrontError::Configuration(format!(
                        "{} must be a whole number of seconds, got {:?}",
                        key, raw
                    ))
                }),
            }
        };

        let file = FileConfig {
            api_base_url: lookup("ESIM_API_BASE_URL"),
            http_timeout_secs: secs("ESIM_HTTP_TIMEOUT_SECS")?,
            session_file: lookup("ESIM_SESSION_FILE").map(PathBuf::from),
            poll_interval_secs: secs("ESIM_POLL_INTERVAL_SECS")?,
            poll_max_secs: secs("ESIM_POLL_MAX_SECS")?,
        };
        Self::default().merge(file)
    }

    /// Parse a TOML document, applying its keys over the defaults
    pub fn from_toml_str(source: &str) -> Result<Self, StorefrontError> {
        let file: FileConfig = toml::from_str(source)
            .map_err(|e| StorefrontError::Configuration(format!("invalid config file: {}", e)))?;
        Self::default().merge(file)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, StorefrontError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            StorefrontError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    fn merge(mut self, file: FileConfig) -> Result<Self, StorefrontError> {
        if let Some(url) = file.api_base_url {
            self = self.with_api_base_url(url);
        }
        if let Some(secs) = file.http_timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = file.session_file {
            self.session_file = path;
        }
        if let Some(secs) = file.poll_interval_secs {
            self.poll.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = file.poll_max_secs {
            self.poll.max_duration = Duration::from_secs(secs);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants the client relies on
    pub fn validate(&self) -> Result<(), StorefrontError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(StorefrontError::Configuration(format!(
                "api base url must start with http:// or https://, got {}",
                self.api_base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(StorefrontError::Configuration(
                "http timeout must be greater than zero".to_string(),
            ));
        }
        if self.poll.interval.is_zero() {
            return Err(StorefrontError::Configuration(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        for (name, value) in [
            ("http timeout", self.timeout),
            ("poll interval", self.poll.interval),
            ("poll max duration", self.poll.max_duration),
            ("success redirect delay", self.success_redirect_delay),
        ] {
            if value > MAX_DURATION_SETTING {
                return Err(StorefrontError::Configuration(format!(
                    "{} must be at most {} seconds, got {}",
                    name,
                    MAX_DURATION_SETTING.as_secs(),
                    value.as_secs()
                )));
            }
        }
        Ok(())
    }

    /// Builder: set the API root (trailing slashes are dropped)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set the session file location
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Builder: replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builder: replace the polling settings
    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_success_redirect_delay(mut self, delay: Duration) -> Self {
        self.success_redirect_delay = delay;
        self
    }

    /// Full URL for an API path such as `/esim-plans`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}
