//! Authentication service.
//!
//! Simulated authentication against a fixed table of demo accounts. A login or
//! registration waits out a configured latency before answering, bounded by
//! the configured timeout. The active session is persisted under
//! [`keys::SESSION`] and restored on construction.

mod demo;
mod error;

pub use demo::{DemoAccount, demo_accounts};
pub use error::AuthError;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use techstore_core::{Email, Role, UserId};

use crate::busy::Busy;
use crate::config::AuthConfig;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{ProfilePatch, Registration, Session};
use crate::storage::{KeyValueStore, keys};

/// Holds the current session, if any.
pub struct AuthStore {
    session: Option<Session>,
    loading: bool,
    accounts: Vec<DemoAccount>,
    storage: Arc<dyn KeyValueStore>,
    config: AuthConfig,
}

impl AuthStore {
    /// Create the store, restoring a persisted session.
    ///
    /// Content that cannot be parsed is removed from storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, config: AuthConfig) -> Self {
        let mut store = Self {
            session: None,
            loading: true,
            accounts: demo_accounts(),
            storage,
            config,
        };
        store.session = restore(store.storage.as_ref());
        store.loading = false;
        store
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True while restoring, logging in or registering.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Authenticated, and holding `required` when given.
    #[must_use]
    pub fn can_access(&self, required: Option<Role>) -> bool {
        match (&self.session, required) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(session), Some(role)) => session.role == role,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.session.as_ref().map(Session::display_name)
    }

    // =========================================================================
    // Login / Registration
    // =========================================================================

    /// Log in with a demo account.
    ///
    /// The email is compared case-insensitively, the password exactly. On
    /// failure the current session (if any) is kept.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches.
    /// Returns `AuthError::TimedOut` if the simulated latency exceeds the timeout.
    #[instrument(skip_all)]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, AuthError> {
        self.simulate_latency(self.config.login_delay).await?;

        let Some(account) = self
            .accounts
            .iter()
            .find(|a| a.has_email(email) && a.verify(password))
        else {
            warn!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let session = Session {
            id: account.id,
            email: Email::parse(account.email)?,
            role: account.role,
            name: account.name.to_string(),
            last_name: account.last_name.to_string(),
            login_time: Utc::now(),
        };
        info!(user_id = %session.id, role = %session.role, "Logged in");
        Ok(self.activate(session))
    }

    /// Register a new user.
    ///
    /// The account table is never modified; a session is created directly
    /// with a fresh id and the `user` role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` if a demo account uses the email.
    /// Returns `AuthError::TimedOut` if the simulated latency exceeds the timeout.
    #[instrument(skip_all)]
    pub async fn register(&mut self, registration: Registration) -> Result<&Session, AuthError> {
        self.simulate_latency(self.config.register_delay).await?;

        if self
            .accounts
            .iter()
            .any(|a| a.has_email(registration.email.as_str()))
        {
            warn!("Registration rejected, email in use");
            return Err(AuthError::EmailTaken);
        }

        let now = Utc::now();
        let session = Session {
            id: UserId::new(now.timestamp_millis()),
            email: registration.email,
            role: Role::User,
            name: registration.name,
            last_name: registration.last_name,
            login_time: now,
        };
        info!(user_id = %session.id, "Registered");
        Ok(self.activate(session))
    }

    /// End the session and forget it.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove(keys::SESSION) {
            warn!(error = %e, "Failed to remove persisted session");
        }
        if self.session.take().is_some() {
            add_breadcrumb("auth", "Logged out", None);
        }
        clear_sentry_user();
    }

    /// Merge profile changes into the session. No validation is applied.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if there is no session.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<&Session, AuthError> {
        let session = self.session.as_mut().ok_or(AuthError::NotAuthenticated)?;
        session.apply(patch);
        persist(self.storage.as_ref(), session);
        debug!(user_id = %session.id, "Profile updated");
        Ok(session)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn activate(&mut self, session: Session) -> &Session {
        persist(self.storage.as_ref(), &session);
        set_sentry_user(&session.id, Some(session.email.as_str()));
        self.session.insert(session)
    }

    async fn simulate_latency(&mut self, delay: Duration) -> Result<(), AuthError> {
        let limit = self.config.timeout;
        let _busy = Busy::new(&mut self.loading);
        tokio::time::timeout(limit, tokio::time::sleep(delay))
            .await
            .map_err(|_| {
                warn!(timeout_ms = limit.as_millis(), "Authentication timed out");
                AuthError::TimedOut
            })
    }
}

fn restore(storage: &dyn KeyValueStore) -> Option<Session> {
    let raw = match storage.get(keys::SESSION) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted session");
            return None;
        }
    };

    match serde_json::from_str::<Session>(&raw) {
        Ok(session) => {
            set_sentry_user(&session.id, Some(session.email.as_str()));
            Some(session)
        }
        Err(e) => {
            warn!(error = %e, "Discarding corrupt persisted session");
            if let Err(e) = storage.remove(keys::SESSION) {
                warn!(error = %e, "Failed to remove corrupt session");
            }
            None
        }
    }
}

fn persist(storage: &dyn KeyValueStore, session: &Session) {
    let result = serde_json::to_string(session)
        .map_err(Into::into)
        .and_then(|json| storage.set(keys::SESSION, &json));
    if let Err(e) = result {
        warn!(error = %e, "Failed to persist session");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::storage::MemoryStore;

    fn store(storage: &Arc<MemoryStore>) -> AuthStore {
        AuthStore::new(storage.clone(), AuthConfig::instant())
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: Email::parse(email).unwrap(),
            name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            password: SecretString::from("secret1"),
        }
    }

    #[tokio::test]
    async fn test_admin_login() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = store(&storage);

        let session = auth.login("admin@techstore.com", "admin123").await.unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.id, UserId::new(1));

        assert!(auth.is_authenticated());
        assert!(auth.is_admin());
        assert!(auth.can_access(Some(Role::Admin)));
        assert!(!auth.can_access(Some(Role::User)));
        assert!(!auth.is_loading());
        assert_eq!(auth.display_name().as_deref(), Some("Administrador TechStore"));
    }

    #[tokio::test]
    async fn test_login_email_case_insensitive() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = store(&storage);
        let session = auth.login("Demo@Demo.COM", "demo123").await.unwrap();
        assert_eq!(session.email.as_str(), "demo@demo.com");
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_session() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = store(&storage);
        auth.login("usuario@techstore.com", "user123").await.unwrap();

        let err = auth.login("admin@techstore.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let session = auth.session().unwrap();
        assert_eq!(session.email.as_str(), "usuario@techstore.com");
        assert!(!auth.is_admin());
    }

    #[tokio::test]
    async fn test_register_rejects_demo_email() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = store(&storage);

        let err = auth
            .register(registration("usuario@techstore.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert!(!auth.is_authenticated());

        let err = auth
            .register(registration("ADMIN@techstore.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_creates_user_session() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = store(&storage);

        let session = auth.register(registration("ana@example.com")).await.unwrap();
        assert_eq!(session.role, Role::User);
        assert!(session.id.as_i64() > 3);
        assert!(auth.can_access(None));

        // The account table is untouched
        auth.logout();
        let err = auth.login("ana@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let storage = Arc::new(MemoryStore::new());
        {
            let mut auth = store(&storage);
            auth.login("demo@demo.com", "demo123").await.unwrap();
        }

        let auth = store(&storage);
        let session = auth.session().unwrap();
        assert_eq!(session.email.as_str(), "demo@demo.com");
        assert_eq!(session.last_name, "User");
    }

    #[tokio::test]
    async fn test_logout_clears_storage() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = store(&storage);
        auth.login("demo@demo.com", "demo123").await.unwrap();

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(!auth.can_access(None));
        assert!(storage.get(keys::SESSION).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_session_is_removed() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(keys::SESSION, "{not json").unwrap();

        let auth = store(&storage);
        assert!(!auth.is_authenticated());
        assert!(!auth.is_loading());
        assert!(storage.get(keys::SESSION).unwrap().is_none());
    }

    #[test]
    fn test_session_with_invalid_email_is_removed() {
        let storage = Arc::new(MemoryStore::new());
        let raw = r#"{"id":1,"email":"not-an-email","role":"admin","name":"Administrador","lastName":"TechStore","loginTime":"2024-05-01T10:00:00Z"}"#;
        storage.set(keys::SESSION, raw).unwrap();

        let auth = store(&storage);
        assert!(!auth.is_authenticated());
        assert!(storage.get(keys::SESSION).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_persists() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = store(&storage);

        let err = auth.update_profile(ProfilePatch::default()).unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));

        auth.login("usuario@techstore.com", "user123").await.unwrap();
        auth.update_profile(ProfilePatch {
            last_name: Some("Perez".to_string()),
            ..ProfilePatch::default()
        })
        .unwrap();

        let restored = store(&storage);
        let session = restored.session().unwrap();
        assert_eq!(session.name, "Usuario");
        assert_eq!(session.last_name, "Perez");
    }

    #[tokio::test]
    async fn test_login_times_out() {
        let storage = Arc::new(MemoryStore::new());
        let mut auth = AuthStore::new(
            storage.clone(),
            AuthConfig {
                login_delay: Duration::from_millis(500),
                register_delay: Duration::ZERO,
                timeout: Duration::from_millis(10),
            },
        );

        let err = auth.login("admin@techstore.com", "admin123").await.unwrap_err();
        assert!(matches!(err, AuthError::TimedOut));
        assert!(!auth.is_authenticated());
        assert!(!auth.is_loading());
        assert!(storage.get(keys::SESSION).unwrap().is_none());
    }
}
