//! # Storefront
//!
//! Wires the client pieces together around one session store and one
//! navigator.

use crate::api::{AdminApi, PaymentApi};
use crate::auth::AuthService;
use crate::checkout::CheckoutController;
use crate::config::ClientConfig;
use crate::http::ApiClient;
use crate::poller::StatusPoller;
use crate::session::SessionStore;
use crate::storage::{FileStorage, SessionStorage};
use esim_core::{SharedNavigator, SharedPaymentBackend, StorefrontResult};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct Storefront {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub navigator: SharedNavigator,
    pub payments: PaymentApi,
    pub admin_api: AdminApi,
    pub auth: AuthService,
    pub checkout: Arc<CheckoutController>,
}

impl Storefront {
    /// Build every service on top of `storage`, restoring any saved session
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn SessionStorage>,
        navigator: SharedNavigator,
    ) -> StorefrontResult<Self> {
        let session = Arc::new(SessionStore::load(storage));
        let client = Arc::new(ApiClient::new(&config, session.clone(), navigator.clone())?);

        let payments = PaymentApi::new(client.clone());
        let admin_api = AdminApi::new(client);
        let auth = AuthService::new(admin_api.clone(), session.clone());

        let backend: SharedPaymentBackend = Arc::new(payments.clone());
        let poller = StatusPoller::new(backend.clone(), config.poll);
        let checkout = Arc::new(CheckoutController::new(
            backend,
            navigator.clone(),
            poller,
            config.success_redirect_delay,
        ));

        debug!(
            api = %config.api_base_url,
            signed_in = session.is_authenticated(),
            "Storefront client ready"
        );

        Ok(Self {
            config,
            session,
            navigator,
            payments,
            admin_api,
            auth,
            checkout,
        })
    }

    /// Session persisted to `config.session_file`
    pub fn with_file_session(
        config: ClientConfig,
        navigator: SharedNavigator,
    ) -> StorefrontResult<Self> {
        let storage = Arc::new(FileStorage::new(config.session_file.clone()));
        Self::new(config, storage, navigator)
    }

    pub fn admin_console(&self) -> crate::admin::AdminConsole {
        crate::admin::AdminConsole::new(self.admin_api.clone())
    }
}
