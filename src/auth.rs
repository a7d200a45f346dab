//! Authentication state consumed by views.
//!
//! Token issuance happens elsewhere; this only tracks whether a credential
//! is present and lets the user store or drop one.

use crate::error::{AppError, AppResult};
use crate::session::CredentialStore;
use crate::utils::logging;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Stored credential not read yet
    Loading,
    Authenticated,
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthStatus::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated)
    }

    fn from_has_token(has_token: bool) -> Self {
        if has_token {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

pub struct AuthContext {
    store: Arc<dyn CredentialStore>,
    status: AuthStatus,
}

impl AuthContext {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            status: AuthStatus::Loading,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn store(&self) -> Arc<dyn CredentialStore> {
        self.store.clone()
    }

    /// Reads the store off the async executor; file-backed stores block.
    pub async fn resolve(store: Arc<dyn CredentialStore>) -> AuthStatus {
        let has_token = tokio::task::spawn_blocking(move || store.has_token())
            .await
            .unwrap_or_else(|e| {
                log::error!("Credential lookup task failed: {}", e);
                false
            });
        AuthStatus::from_has_token(has_token)
    }

    pub fn apply(&mut self, status: AuthStatus) {
        self.status = status;
    }

    /// Re-reads the store, e.g. after the API client purged the token.
    pub fn refresh_from_store(&mut self) -> AuthStatus {
        self.status = AuthStatus::from_has_token(self.store.has_token());
        self.status
    }

    pub fn login(&mut self, token: &str) -> AppResult<AuthStatus> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::invalid_input("Token cannot be empty"));
        }
        self.store.set_token(token)?;
        logging::log_auth_event("Credential stored");
        self.status = AuthStatus::Authenticated;
        Ok(self.status)
    }

    pub fn logout(&mut self) -> AppResult<AuthStatus> {
        self.store.clear()?;
        logging::log_auth_event("Logged out");
        self.status = AuthStatus::Unauthenticated;
        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryCredentialStore;

    #[test]
    fn test_starts_loading() {
        let ctx = AuthContext::new(Arc::new(MemoryCredentialStore::new()));
        assert!(ctx.status().is_loading());
        assert!(!ctx.status().is_authenticated());
    }

    #[test]
    fn test_resolve_reads_store() {
        let with_token: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::with_token("t"));
        let empty: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());

        assert_eq!(tokio_test::block_on(AuthContext::resolve(with_token)), AuthStatus::Authenticated);
        assert_eq!(tokio_test::block_on(AuthContext::resolve(empty)), AuthStatus::Unauthenticated);
    }

    #[test]
    fn test_login_and_logout() {
        let store = Arc::new(MemoryCredentialStore::new());
        let mut ctx = AuthContext::new(store.clone());

        assert!(ctx.login("   ").is_err());
        assert_eq!(ctx.login(" abc ").unwrap(), AuthStatus::Authenticated);
        assert_eq!(store.token().as_deref(), Some("abc"));

        assert_eq!(ctx.logout().unwrap(), AuthStatus::Unauthenticated);
        assert!(store.token().is_none());
    }

    #[test]
    fn test_refresh_after_external_purge() {
        let store = Arc::new(MemoryCredentialStore::with_token("abc"));
        let mut ctx = AuthContext::new(store.clone());
        assert_eq!(ctx.refresh_from_store(), AuthStatus::Authenticated);

        store.clear().unwrap();
        assert_eq!(ctx.refresh_from_store(), AuthStatus::Unauthenticated);
    }
}
