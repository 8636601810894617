//! Identity provider client.
//!
//! The hosted provider verifies credentials; the app only keeps the resulting
//! session. `InMemoryAuthClient` stands in for it in dev and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use thiserror::Error;

use opsdesk_auth::{Role, Session};
use opsdesk_core::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("this account has been disabled")]
    UserDisabled,

    #[error("not signed in")]
    NotSignedIn,

    #[error("auth client failure: {0}")]
    Internal(String),
}

#[async_trait::async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Signing out with no session is a no-op.
    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn current_session(&self) -> Option<Session>;

    async fn require_session(&self) -> Result<Session, AuthError> {
        self.current_session().await.ok_or(AuthError::NotSignedIn)
    }
}

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
    display_name: Option<String>,
    role: Role,
    disabled: bool,
}

/// In-memory identity provider. Passwords are kept in plain text: dev/test only.
#[derive(Debug, Default)]
pub struct InMemoryAuthClient {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<Session>>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn poisoned<T>(_: T) -> AuthError {
    AuthError::Internal("lock poisoned".to_string())
}

impl InMemoryAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return its user id.
    pub fn register(
        &self,
        email: &str,
        password: impl Into<String>,
        display_name: Option<&str>,
        role: Role,
    ) -> Result<UserId, AuthError> {
        let user_id = UserId::new();
        self.accounts.write().map_err(poisoned)?.insert(
            normalize_email(email),
            Account {
                user_id,
                password: password.into(),
                display_name: display_name.map(str::to_string),
                role,
                disabled: false,
            },
        );
        Ok(user_id)
    }

    pub fn set_disabled(&self, email: &str, disabled: bool) -> Result<(), AuthError> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        let account = accounts
            .get_mut(&normalize_email(email))
            .ok_or(AuthError::InvalidCredentials)?;
        account.disabled = disabled;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthClient for InMemoryAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        let account = self
            .accounts
            .read()
            .map_err(poisoned)?
            .get(&email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        if account.password != password {
            tracing::info!(%email, "sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }
        if account.disabled {
            return Err(AuthError::UserDisabled);
        }

        let session = Session {
            user_id: account.user_id,
            email,
            display_name: account.display_name,
            role: account.role,
            signed_in_at: Utc::now(),
        };
        *self.session.write().map_err(poisoned)? = Some(session.clone());
        tracing::info!(user_id = %session.user_id, role = %session.role, "signed in");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(session) = self.session.write().map_err(poisoned)?.take() {
            tracing::info!(user_id = %session.user_id, "signed out");
        }
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_auth::Permission;

    fn client() -> InMemoryAuthClient {
        let client = InMemoryAuthClient::new();
        client
            .register("Admin@Example.com", "correct horse", Some("Dana Admin"), Role::Admin)
            .unwrap();
        client.register("viewer@example.com", "hunter22", None, Role::Viewer).unwrap();
        client
    }

    #[tokio::test]
    async fn sign_in_establishes_session() {
        let client = client();
        let session = client.sign_in(" admin@example.com ", "correct horse").await.unwrap();

        assert_eq!(session.email, "admin@example.com");
        assert_eq!(session.greeting_name(), "Dana Admin");
        assert!(session.can(Permission::UsersManage));
        assert_eq!(client.current_session().await, Some(session));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let client = client();
        assert_eq!(
            client.sign_in("admin@example.com", "nope").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            client.sign_in("ghost@example.com", "nope").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert!(client.current_session().await.is_none());
    }

    #[tokio::test]
    async fn disabled_accounts_cannot_sign_in() {
        let client = client();
        client.set_disabled("viewer@example.com", true).unwrap();

        assert_eq!(
            client.sign_in("viewer@example.com", "hunter22").await.unwrap_err(),
            AuthError::UserDisabled
        );
    }

    #[tokio::test]
    async fn sign_out_clears_session() {
        let client = client();
        client.sign_in("viewer@example.com", "hunter22").await.unwrap();
        assert_eq!(client.require_session().await.unwrap().greeting_name(), "viewer");

        client.sign_out().await.unwrap();
        client.sign_out().await.unwrap();
        assert_eq!(client.require_session().await.unwrap_err(), AuthError::NotSignedIn);
    }
}
