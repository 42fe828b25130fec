//! # Payment Types
//!
//! Payment methods, transaction status and the checkout form that feeds
//! `POST /payments/create`.

use crate::plan::Plan;
use crate::validation::{char_len, is_valid_email, Validate, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment methods offered at checkout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "MPU")]
    Mpu,
    #[serde(rename = "VISA_MASTERCARD")]
    VisaMastercard,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "UABPAY")]
    UabPay,
    #[serde(rename = "MMQR")]
    Mmqr,
}

/// How a method completes after the payment order is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlow {
    /// Confirmed on submission; the success page follows after a short delay
    Synchronous,
    /// Customer scans a QR code in another app; the client polls for status
    QrCode,
    /// Customer is sent to the provider's own page
    Redirect,
}

impl PaymentMethod {
    /// Every method, in checkout display order
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Mpu,
        PaymentMethod::Mmqr,
        PaymentMethod::UabPay,
        PaymentMethod::VisaMastercard,
        PaymentMethod::Upi,
    ];

    /// Wire name used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Mpu => "MPU",
            PaymentMethod::VisaMastercard => "VISA_MASTERCARD",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::UabPay => "UABPAY",
            PaymentMethod::Mmqr => "MMQR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Mpu => "MPU Card",
            PaymentMethod::VisaMastercard => "Visa/Mastercard",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::UabPay => "UABPay",
            PaymentMethod::Mmqr => "Myanmar QR",
        }
    }

    pub fn flow(&self) -> PaymentFlow {
        match self {
            PaymentMethod::Mmqr => PaymentFlow::QrCode,
            PaymentMethod::UabPay => PaymentFlow::Redirect,
            PaymentMethod::Mpu | PaymentMethod::VisaMastercard | PaymentMethod::Upi => {
                PaymentFlow::Synchronous
            }
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace(['-', '/'], "_");
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown payment method: {}", s))
    }
}

/// Transaction status as reported by `GET /payments/{id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Refunded,
}

impl PaymentStatus {
    /// Once terminal, the status never changes and polling must stop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed
                | PaymentStatus::Failed
                | PaymentStatus::Cancelled
                | PaymentStatus::Refunded
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Processing => "PROCESSING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Cancelled => "CANCELLED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_uppercase()))
            .map_err(|_| format!("unknown payment status: {}", s))
    }
}

/// MPU card fields entered on the checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub cardholder_name: String,
}

impl Validate for CardDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let number: String = self.card_number.chars().filter(|c| !c.is_whitespace()).collect();

        errors.check(
            number.len() >= 16,
            "card_number",
            "Card number must be at least 16 digits",
        );
        errors.check(
            matches!(self.expiry_month.parse::<u8>(), Ok(1..=12)) && self.expiry_month.len() == 2,
            "expiry_month",
            "Invalid month",
        );
        errors.check(
            self.expiry_year.len() == 2 && self.expiry_year.chars().all(|c| c.is_ascii_digit()),
            "expiry_year",
            "Invalid year",
        );
        errors.check(
            self.cvv.len() == 3 && self.cvv.chars().all(|c| c.is_ascii_digit()),
            "cvv",
            "CVV must be 3 digits",
        );
        errors.check(
            char_len(&self.cardholder_name) >= 2,
            "cardholder_name",
            "Cardholder name is required",
        );
        errors.into_result()
    }
}

/// Extra MMQR input (the wallet phone number is optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MmqrDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Everything the customer fills in on the payment page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub payment_method: PaymentMethod,
    pub esim_plan_id: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub card: Option<CardDetails>,
    pub mmqr: Option<MmqrDetails>,
}

impl CheckoutForm {
    pub fn new(payment_method: PaymentMethod, esim_plan_id: impl Into<String>) -> Self {
        Self {
            payment_method,
            esim_plan_id: esim_plan_id.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn with_card(mut self, card: CardDetails) -> Self {
        self.card = Some(card);
        self
    }

    pub fn with_mmqr(mut self, mmqr: MmqrDetails) -> Self {
        self.mmqr = Some(mmqr);
        self
    }
}

impl Validate for CheckoutForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(
            !self.esim_plan_id.trim().is_empty(),
            "esim_plan_id",
            "Please select an eSIM plan",
        );

        if let Some(email) = non_blank(&self.customer_email) {
            errors.check(
                is_valid_email(email),
                "customer_email",
                "Please enter a valid email address",
            );
        }

        // Card fields only matter for MPU; other methods never send them.
        if self.payment_method == PaymentMethod::Mpu {
            if let Some(Err(card_errors)) = self.card.as_ref().map(Validate::validate) {
                errors.extend(card_errors);
            }
        }

        errors.into_result()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Wire payload for `POST /payments/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub currency: String,
    pub esim_plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpu_card: Option<CardDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mmqr_data: Option<MmqrDetails>,
}

impl PaymentRequest {
    /// Build the payload; amount and currency always come from the plan.
    pub fn from_form(form: &CheckoutForm, plan: &Plan) -> Self {
        Self {
            payment_method: form.payment_method,
            amount: plan.price,
            currency: plan.currency.clone(),
            esim_plan_id: form.esim_plan_id.clone(),
            customer_email: non_blank(&form.customer_email).map(String::from),
            customer_phone: non_blank(&form.customer_phone).map(String::from),
            mpu_card: match form.payment_method {
                PaymentMethod::Mpu => form.card.clone(),
                _ => None,
            },
            mmqr_data: match form.payment_method {
                PaymentMethod::Mmqr => form.mmqr.clone(),
                _ => None,
            },
        }
    }
}

/// Response of `POST /payments/create`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// QR image to display (MMQR)
    #[serde(default)]
    pub qr_code_url: Option<String>,
    /// Seconds until the QR code stops being accepted
    #[serde(default)]
    pub qr_expires_in: Option<u64>,
    /// Provider page to navigate to (UABPay)
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// Hosted card form, when the provider supplies one
    #[serde(default)]
    pub payment_url: Option<String>,
}

/// Response of `GET /payments/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    #[serde(default)]
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardDetails {
        CardDetails {
            card_number: "9503 1234 5678 9012".to_string(),
            expiry_month: "07".to_string(),
            expiry_year: "27".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "Aung Aung".to_string(),
        }
    }

    fn plan() -> Plan {
        serde_json::from_value(serde_json::json!({
            "id": "esim_1gb_7days",
            "name": "Tourist 7 Days",
            "data_allowance": "1GB",
            "validity": "7 Days",
            "price": 15000,
            "currency": "MMK"
        }))
        .unwrap()
    }

    #[test]
    fn test_method_flows() {
        assert_eq!(PaymentMethod::Mmqr.flow(), PaymentFlow::QrCode);
        assert_eq!(PaymentMethod::UabPay.flow(), PaymentFlow::Redirect);
        assert_eq!(PaymentMethod::Mpu.flow(), PaymentFlow::Synchronous);
        assert_eq!(PaymentMethod::VisaMastercard.flow(), PaymentFlow::Synchronous);
        assert_eq!(PaymentMethod::Upi.flow(), PaymentFlow::Synchronous);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("mmqr".parse::<PaymentMethod>().unwrap(), PaymentMethod::Mmqr);
        assert_eq!(
            "visa-mastercard".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::VisaMastercard
        );
        assert!("paypal".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::UabPay).unwrap(),
            "\"UABPAY\""
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Processing.is_terminal());
        assert!(PaymentStatus::Completed.is_success());
        assert!(!PaymentStatus::Refunded.is_success());
        assert_eq!("processing".parse::<PaymentStatus>().unwrap(), PaymentStatus::Processing);
    }

    #[test]
    fn test_checkout_form_validation() {
        assert!(CheckoutForm::new(PaymentMethod::Mmqr, "esim_1gb_7days")
            .validate()
            .is_ok());

        let errors = CheckoutForm::new(PaymentMethod::Mmqr, "")
            .with_email("not-an-email")
            .validate()
            .unwrap_err();
        assert!(errors.field("esim_plan_id").is_some());
        assert!(errors.field("customer_email").is_some());

        let mut bad_card = card();
        bad_card.expiry_month = "13".to_string();
        bad_card.cvv = "12".to_string();
        let errors = CheckoutForm::new(PaymentMethod::Mpu, "esim_1gb_7days")
            .with_card(bad_card.clone())
            .validate()
            .unwrap_err();
        assert_eq!(errors.field("expiry_month"), Some("Invalid month"));
        assert_eq!(errors.field("cvv"), Some("CVV must be 3 digits"));

        // Card fields are ignored for methods that do not use them
        assert!(CheckoutForm::new(PaymentMethod::Upi, "esim_1gb_7days")
            .with_card(bad_card)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_payment_request_from_form() {
        let form = CheckoutForm::new(PaymentMethod::Mpu, "esim_1gb_7days")
            .with_email("  ")
            .with_phone("09123456789")
            .with_card(card())
            .with_mmqr(MmqrDetails::default());
        let request = PaymentRequest::from_form(&form, &plan());

        assert_eq!(request.amount, 15000.0);
        assert_eq!(request.currency, "MMK");
        assert!(request.customer_email.is_none());
        assert!(request.mpu_card.is_some());
        assert!(request.mmqr_data.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["payment_method"], "MPU");
        assert_eq!(json["mpu_card"]["cardNumber"], "9503 1234 5678 9012");
        assert!(json.get("customer_email").is_none());
    }

    #[test]
    fn test_payment_details_naive_timestamp() {
        let details: PaymentDetails = serde_json::from_str(
            r#"{"transaction_id": "ESIM_1_ABC", "status": "PENDING", "amount": 15000,
                "currency": "MMK", "payment_method": "MMQR",
                "created_at": "2024-05-01T09:30:00.123456",
                "updated_at": "2024-05-01T09:31:00"}"#,
        )
        .unwrap();

        assert_eq!(details.status, PaymentStatus::Pending);
        assert_eq!(details.payment_method, PaymentMethod::Mmqr);
        assert!(details.updated_at.is_some());
    }
}
