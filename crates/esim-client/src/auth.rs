//! # Auth Service
//!
//! Admin sign-in and sign-out on top of `AdminApi` and `SessionStore`.

use crate::api::AdminApi;
use crate::session::SessionStore;
use esim_core::{AdminUser, LoginCredentials};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AuthService {
    api: AdminApi,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: AdminApi, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Sign in; returns whether a session is now active.
    ///
    /// Failures of any kind (bad credentials, network, a response without a
    /// token, storage) are logged and reported as `false`. No partial
    /// session is ever left behind.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let credentials = LoginCredentials::new(email, password);

        let response = match self.api.login(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!(email, error = %e, "Login failed");
                return false;
            }
        };

        let Some(token) = response.access_token.filter(|t| !t.is_empty()) else {
            warn!(email, "Login response carried no access token");
            return false;
        };

        if let Err(e) = self.session.establish(token, AdminUser::admin(email)) {
            warn!(email, error = %e, "Could not persist session");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "Could not roll back partial session");
            }
            return false;
        }

        info!(email, "Admin signed in");
        true
    }

    pub fn logout(&self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to remove stored session");
        }
        info!("Admin signed out");
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }
}
