//! # Admin Types
//!
//! Login, dashboard and payment-gateway configuration payloads used by the
//! admin area.

use crate::payment::{PaymentMethod, PaymentStatus};
use crate::validation::{char_len, is_valid_email, Validate, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role recorded for every user who signs in through the admin login
pub const ADMIN_ROLE: &str = "admin";

/// Body of `POST /admin/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Validate for LoginCredentials {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            is_valid_email(self.email.trim()),
            "email",
            "Please enter a valid email address",
        );
        errors.check(
            self.password.chars().count() >= 6,
            "password",
            "Password must be at least 6 characters",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Identity kept alongside the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub email: String,
    pub role: String,
}

impl AdminUser {
    /// The login endpoint does not return a profile, so one is synthesized
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: ADMIN_ROLE.to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Payment gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayEnvironment {
    #[serde(rename = "UAT")]
    Uat,
    #[serde(rename = "LIVE")]
    Live,
}

impl GatewayEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayEnvironment::Uat => "UAT",
            GatewayEnvironment::Live => "LIVE",
        }
    }
}

impl fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UAT" => Ok(GatewayEnvironment::Uat),
            "LIVE" => Ok(GatewayEnvironment::Live),
            other => Err(format!("environment must be UAT or LIVE, got {}", other)),
        }
    }
}

/// Aggregate payment counters shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStatistics {
    pub total_payments: u64,
    pub completed_payments: u64,
    pub pending_payments: u64,
    pub failed_payments: u64,
    /// Percentage, 0-100
    #[serde(default)]
    pub success_rate: f64,
}

/// One row of the recent transactions table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /admin/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub statistics: DashboardStatistics,
    #[serde(default)]
    pub recent_transactions: Vec<TransactionRecord>,
    pub current_environment: GatewayEnvironment,
}

/// Response of `GET /admin/payment-gateway/config`; keys arrive masked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub environment: GatewayEnvironment,
    #[serde(default)]
    pub merchant_user_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub access_key_masked: String,
    #[serde(default)]
    pub secret_key_masked: String,
    #[serde(default, with = "crate::timestamp::option")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Body of `POST /admin/payment-gateway/config`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfigUpdate {
    pub environment: GatewayEnvironment,
    pub access_key: String,
    pub secret_key: String,
}

// Keys must never reach the logs.
impl fmt::Debug for GatewayConfigUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfigUpdate")
            .field("environment", &self.environment)
            .field("access_key", &"***")
            .field("secret_key", &"***")
            .finish()
    }
}

impl Validate for GatewayConfigUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            char_len(&self.access_key) >= 10,
            "access_key",
            "Access key must be at least 10 characters",
        );
        errors.check(
            char_len(&self.secret_key) >= 20,
            "secret_key",
            "Secret key must be at least 20 characters",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfigResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub environment: Option<GatewayEnvironment>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validation() {
        assert!(LoginCredentials::new("admin@esim.com.mm", "secret1")
            .validate()
            .is_ok());

        let errors = LoginCredentials::new("admin", "123")
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_synthesized_admin_user() {
        let user = AdminUser::admin("ops@esim.com.mm");
        assert_eq!(user.role, ADMIN_ROLE);
        assert!(user.is_admin());
    }

    #[test]
    fn test_gateway_update_validation_and_redaction() {
        let update = GatewayConfigUpdate {
            environment: GatewayEnvironment::Uat,
            access_key: "short".to_string(),
            secret_key: "also-too-short".to_string(),
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field("access_key").is_some());
        assert!(errors.field("secret_key").is_some());

        let debug = format!("{:?}", update);
        assert!(!debug.contains("also-too-short"));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("live".parse::<GatewayEnvironment>().unwrap(), GatewayEnvironment::Live);
        assert!("prod".parse::<GatewayEnvironment>().is_err());
    }

    #[test]
    fn test_dashboard_deserialization() {
        let json = serde_json::json!({
            "statistics": {
                "total_payments": 4,
                "completed_payments": 2,
                "pending_payments": 1,
                "failed_payments": 1,
                "success_rate": 50.0
            },
            "recent_transactions": [{
                "_id": "65f0c0ffee",
                "transaction_id": "ESIM_1714550000000_AB12CD34",
                "amount": 15000,
                "currency": "MMK",
                "payment_method": "MMQR",
                "status": "COMPLETED",
                "customer_email": null,
                "created_at": "2024-05-01T09:30:00.123000"
            }],
            "current_environment": "UAT"
        });
        let data: DashboardData = serde_json::from_value(json).unwrap();

        assert_eq!(data.statistics.total_payments, 4);
        assert_eq!(data.recent_transactions.len(), 1);
        assert_eq!(data.recent_transactions[0].status, PaymentStatus::Completed);
        assert_eq!(data.current_environment, GatewayEnvironment::Uat);
    }
}
