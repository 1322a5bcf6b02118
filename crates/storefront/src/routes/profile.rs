//! Profile page (requires a signed-in user).

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;

use super::layout::Layout;
use crate::filters;
use crate::middleware::RequireAuth;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub name: String,
    pub email: String,
    pub initial: String,
}

/// Display the signed-in user's profile. Visitors are sent to `/login`.
pub async fn show(RequireAuth(user): RequireAuth, session: Session) -> impl IntoResponse {
    let initial = user
        .name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();

    ProfileTemplate {
        layout: Layout::load(&session).await,
        name: user.name,
        email: user.email.into_inner(),
        initial,
    }
}
