//! Users, credentials, and authentication state.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{Email, UserId};

/// A shop customer as returned by the backend.
///
/// The `token` field is present on some backend payloads; the storefront keeps
/// the token in its own session entry and never renders it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    /// First word of the name, for greetings in the header.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Authentication state derived for each request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// No one is signed in.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: false,
            error: None,
        }
    }

    /// A token is present; `user` may be missing if its entry was lost.
    #[must_use]
    pub const fn signed_in(user: Option<User>) -> Self {
        Self {
            user,
            is_authenticated: true,
            loading: false,
            error: None,
        }
    }

    /// Keep the current identity but record a failed action.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.loading = false;
        self.error = Some(message.into());
        self
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterData")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
