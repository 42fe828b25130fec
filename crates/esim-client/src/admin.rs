//! # Admin Console
//!
//! Dashboard and payment-gateway configuration workflows for a signed-in
//! admin.

use crate::api::AdminApi;
use esim_core::{
    DashboardData, GatewayConfig, GatewayConfigUpdate, StorefrontError, StorefrontResult,
    Validate,
};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct AdminConsole {
    api: AdminApi,
}

impl AdminConsole {
    pub fn new(api: AdminApi) -> Self {
        Self { api }
    }

    pub async fn dashboard(&self) -> StorefrontResult<DashboardData> {
        self.api.dashboard().await
    }

    /// Current gateway settings, keys masked
    pub async fn gateway_config(&self) -> StorefrontResult<GatewayConfig> {
        self.api.payment_config().await
    }

    /// Validate and store new gateway credentials, then reload the masked
    /// view so the caller never keeps the raw keys around.
    #[instrument(skip_all, fields(environment = %update.environment))]
    pub async fn save_gateway_config(
        &self,
        update: &GatewayConfigUpdate,
    ) -> StorefrontResult<GatewayConfig> {
        update.validate()?;

        let response = self.api.update_payment_config(update).await?;
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Failed to update configuration".to_string());
            warn!(%message, "Gateway configuration rejected");
            return Err(StorefrontError::Rejected { message });
        }

        info!("Gateway configuration updated");
        self.api.payment_config().await
    }
}
