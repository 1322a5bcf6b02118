//! Authentication service.
//!
//! Credentials are checked by the REST backend. On success the bearer token
//! and user are written to the visitor session under `token` and `user`;
//! sign-out removes both and leaves the cart alone.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;
use tracing::{info, warn};
use wenshop_core::validation::{validate_login, validate_registration};
use wenshop_core::{AuthState, User};

use crate::api::{ApiClient, AuthSession};
use crate::models::session_keys;

/// Authentication service bound to one visitor session.
pub struct AuthService<'a> {
    api: &'a ApiClient,
    session: &'a Session,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a Session) -> Self {
        Self { api, session }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is blank, `AuthError::Rejected`
    /// if the backend refuses the credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let credentials = validate_login(email, password)?;
        let auth = self.api.login(&credentials).await?;
        self.store(auth).await
    }

    /// Create an account and sign in to it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is incomplete or the
    /// passwords disagree, `AuthError::Rejected` if the backend refuses.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        let data = validate_registration(name, email, password, confirm_password)?;
        let auth = self.api.register(&data).await?;
        self.store(auth).await
    }

    /// Sign out, keeping the cart.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the session cannot be modified.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.remove::<String>(session_keys::TOKEN).await?;
        self.session.remove::<User>(session_keys::USER).await?;
        Ok(())
    }

    async fn store(&self, auth: AuthSession) -> Result<User, AuthError> {
        let AuthSession { token, mut user } = auth;
        user.token = None;

        // New identity, new session id
        self.session.cycle_id().await?;
        self.session
            .insert(session_keys::TOKEN, token.expose_secret())
            .await?;
        self.session.insert(session_keys::USER, &user).await?;

        info!(user_id = %user.id, "User signed in");
        Ok(user)
    }
}

/// Authentication state for the visitor.
///
/// Signed in whenever a token is stored, even if the user entry is missing.
/// Unreadable entries are treated as absent.
pub async fn auth_state(session: &Session) -> AuthState {
    if session_token(session).await.is_none() {
        return AuthState::signed_out();
    }

    let user = match session.get::<User>(session_keys::USER).await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Discarding unreadable user entry");
            None
        }
    };

    AuthState::signed_in(user)
}

/// Authentication state after a failed sign-in or registration.
///
/// The current identity is kept; only `error` records the failure.
pub async fn failed_state(session: &Session, message: impl Into<String>) -> AuthState {
    auth_state(session).await.with_error(message)
}

/// The stored bearer token, if any.
pub async fn session_token(session: &Session) -> Option<SecretString> {
    session
        .get::<String>(session_keys::TOKEN)
        .await
        .ok()
        .flatten()
        .filter(|token| !token.is_empty())
        .map(SecretString::from)
}
