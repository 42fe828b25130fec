//! # Session Store
//!
//! The signed-in admin, shared by the HTTP client (bearer header, 401
//! handling) and the auth service. Memory is the source of truth while the
//! process runs; storage carries the session across restarts.

use crate::storage::{SessionStorage, AUTH_TOKEN_KEY, AUTH_USER_KEY};
use esim_core::{AdminUser, StorefrontResult};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Bearer token plus the identity it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: AdminUser,
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Empty store backed by `storage`; nothing is read yet
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Restore a persisted session.
    ///
    /// Both keys must be present and the user record must parse, otherwise
    /// the store starts signed out.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        let store = Self::new(storage);
        match store.read_persisted() {
            Ok(Some(session)) => {
                debug!(email = %session.user.email, "Restored admin session");
                *store.write() = Some(session);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable stored session"),
        }
        store
    }

    fn read_persisted(&self) -> StorefrontResult<Option<Session>> {
        let token = self.storage.get(AUTH_TOKEN_KEY)?;
        let user = self.storage.get(AUTH_USER_KEY)?;

        let (Some(token), Some(user)) = (token, user) else {
            return Ok(None);
        };
        let user: AdminUser = serde_json::from_str(&user)?;
        Ok(Some(Session { token, user }))
    }

    /// Persist and activate a new session
    pub fn establish(&self, token: impl Into<String>, user: AdminUser) -> StorefrontResult<()> {
        let session = Session {
            token: token.into(),
            user,
        };
        self.storage.set(AUTH_TOKEN_KEY, &session.token)?;
        self.storage
            .set(AUTH_USER_KEY, &serde_json::to_string(&session.user)?)?;

        *self.write() = Some(session);
        Ok(())
    }

    /// Forget the session in memory and in storage.
    ///
    /// Memory is cleared first, so the caller is signed out even if storage
    /// fails; both keys are attempted and the first failure is returned.
    pub fn clear(&self) -> StorefrontResult<()> {
        self.write().take();

        let token = self.storage.remove(AUTH_TOKEN_KEY);
        let user = self.storage.remove(AUTH_USER_KEY);
        token.and(user)
    }

    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<AdminUser> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(|s| s.user.is_admin())
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.user())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
