//! Admin endpoints. All but `login` need a bearer token.

use crate::http::ApiClient;
use esim_core::{
    DashboardData, GatewayConfig, GatewayConfigUpdate, LoginCredentials, LoginResponse,
    StorefrontResult, UpdateConfigResponse,
};
use std::sync::Arc;
use tracing::instrument;

const GATEWAY_CONFIG_PATH: &str = "/admin/payment-gateway/config";

#[derive(Clone)]
pub struct AdminApi {
    client: Arc<ApiClient>,
}

impl AdminApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /admin/login`
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> StorefrontResult<LoginResponse> {
        self.client.post("/admin/login", credentials).await
    }

    /// `GET /admin/dashboard`
    pub async fn dashboard(&self) -> StorefrontResult<DashboardData> {
        self.client.get("/admin/dashboard").await
    }

    /// `GET /admin/payment-gateway/config`
    pub async fn payment_config(&self) -> StorefrontResult<GatewayConfig> {
        self.client.get(GATEWAY_CONFIG_PATH).await
    }

    /// `POST /admin/payment-gateway/config`
    #[instrument(skip(self, update), fields(environment = %update.environment))]
    pub async fn update_payment_config(
        &self,
        update: &GatewayConfigUpdate,
    ) -> StorefrontResult<UpdateConfigResponse> {
        self.client.post(GATEWAY_CONFIG_PATH, update).await
    }
}
