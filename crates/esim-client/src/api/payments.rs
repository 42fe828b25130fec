//! Public storefront endpoints: plans, payments and the contact form.

use crate::http::ApiClient;
use async_trait::async_trait;
use esim_core::{
    ContactForm, ContactResponse, CreatePaymentResponse, PaymentBackend, PaymentDetails,
    PaymentRequest, PlanCatalog, StorefrontResult, ValidationErrors,
};
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct PaymentApi {
    client: Arc<ApiClient>,
}

impl PaymentApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /esim-plans`
    pub async fn get_plans(&self) -> StorefrontResult<PlanCatalog> {
        self.client.get("/esim-plans").await
    }

    /// `POST /payments/create`
    #[instrument(skip(self, request), fields(method = %request.payment_method, plan = %request.esim_plan_id))]
    pub async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> StorefrontResult<CreatePaymentResponse> {
        self.client.post("/payments/create", request).await
    }

    /// `GET /payments/{transaction_id}/status`
    pub async fn get_payment_status(&self, transaction_id: &str) -> StorefrontResult<PaymentDetails> {
        check_transaction_id(transaction_id)?;
        self.client
            .get(&format!("/payments/{}/status", transaction_id))
            .await
    }

    /// `POST /contact`
    pub async fn submit_contact_form(&self, form: &ContactForm) -> StorefrontResult<ContactResponse> {
        self.client.post("/contact", form).await
    }
}

/// Transaction ids are interpolated into the path, so only id characters pass
fn check_transaction_id(transaction_id: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(
        !transaction_id.is_empty()
            && transaction_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
        "transaction_id",
        "Invalid transaction id",
    );
    errors.into_result()
}

#[async_trait]
impl PaymentBackend for PaymentApi {
    async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> StorefrontResult<CreatePaymentResponse> {
        PaymentApi::create_payment(self, request).await
    }

    async fn payment_status(&self, transaction_id: &str) -> StorefrontResult<PaymentDetails> {
        self.get_payment_status(transaction_id).await
    }
}
