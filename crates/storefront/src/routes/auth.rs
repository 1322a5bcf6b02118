//! Authentication route handlers.
//!
//! Login, registration, and logout against the REST backend. Form errors
//! re-render the form with the message above it; success redirects home.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};
use wenshop_core::AuthState;

use super::layout::Layout;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::services::auth::{auth_state, failed_state};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Shown for every refused login, whatever the backend said.
const LOGIN_REJECTED: &str = "Email ou senha incorretos.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub auth: AuthState,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub auth: AuthState,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        layout: Layout::load(&session).await,
        auth: auth_state(&session).await,
        email: String::new(),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let service = AuthService::new(state.api(), &session);

    let message = match service.login(&form.email, &form.password).await {
        Ok(user) => {
            set_sentry_user(&user.id, Some(user.email.as_str()));
            return Ok(Redirect::to("/").into_response());
        }
        Err(AuthError::Session(e)) => return Err(e.into()),
        Err(AuthError::Validation(e)) => e.to_string(),
        Err(AuthError::Rejected(reason)) => {
            info!(%reason, "Login refused");
            LOGIN_REJECTED.to_string()
        }
        Err(AuthError::Unavailable(e)) => {
            warn!(error = %e, "Login failed");
            e.user_message()
        }
    };

    Ok(LoginTemplate {
        layout: Layout::load(&session).await,
        auth: failed_state(&session, message).await,
        email: form.email.trim().to_string(),
    }
    .into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(session: Session) -> impl IntoResponse {
    RegisterTemplate {
        layout: Layout::load(&session).await,
        auth: auth_state(&session).await,
        name: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// The new account is signed in straight away.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let service = AuthService::new(state.api(), &session);

    let message = match service
        .register(
            &form.name,
            &form.email,
            &form.password,
            &form.confirm_password,
        )
        .await
    {
        Ok(user) => {
            set_sentry_user(&user.id, Some(user.email.as_str()));
            return Ok(Redirect::to("/").into_response());
        }
        Err(AuthError::Session(e)) => return Err(e.into()),
        Err(AuthError::Validation(e)) => e.to_string(),
        Err(AuthError::Rejected(reason)) => {
            info!(%reason, "Registration refused");
            reason
        }
        Err(AuthError::Unavailable(e)) => {
            warn!(error = %e, "Registration failed");
            e.user_message()
        }
    };

    Ok(RegisterTemplate {
        layout: Layout::load(&session).await,
        auth: failed_state(&session, message).await,
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
    }
    .into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out and return home. The cart is kept.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    AuthService::new(state.api(), &session)
        .logout()
        .await
        .map_err(|e| match e {
            AuthError::Session(e) => AppError::Session(e),
            other => AppError::Internal(other.to_string()),
        })?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}
