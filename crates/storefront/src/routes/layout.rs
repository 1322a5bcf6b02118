//! Data shared by every full page: header greeting, cart badge, and the
//! current search term.

use tower_sessions::Session;

use crate::services::{CartService, auth};

/// Header state rendered by `base.html`.
#[derive(Clone, Default)]
pub struct Layout {
    /// First name of the signed-in user. `None` renders the signed-out
    /// header, including when a token is stored without its user entry.
    pub user_name: Option<String>,
    /// Cart badge in the header.
    pub cart_badge: CartBadge,
    /// Prefill for the header search box.
    pub search: String,
}

/// Units in the cart, as rendered by `partials/cart_count.html`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartBadge {
    pub count: u32,
}

impl CartBadge {
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self { count }
    }

    /// CSS classes for the badge; empty carts get a muted badge.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        if self.count == 0 { "badge badge-empty" } else { "badge" }
    }
}

impl Layout {
    /// Read header state from the visitor session.
    pub async fn load(session: &Session) -> Self {
        let auth = auth::auth_state(session).await;
        let cart_count = CartService::new(session).count().await;

        let user_name = auth
            .user
            .as_ref()
            .filter(|_| auth.is_authenticated)
            .map(|u| u.first_name().to_string());

        Self {
            user_name,
            cart_badge: CartBadge::new(cart_count),
            search: String::new(),
        }
    }

    /// Prefill the header search box.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;
    use wenshop_core::{Email, User, UserId};

    use super::*;
    use crate::models::session_keys;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "Ana Souza".to_string(),
            email: Email::parse("ana@wenshop.com").unwrap(),
            token: None,
        }
    }

    #[tokio::test]
    async fn test_token_without_user_shows_signed_out_header() {
        let session = session();
        session.insert(session_keys::TOKEN, "jwt").await.unwrap();

        assert_eq!(Layout::load(&session).await.user_name, None);
    }

    #[tokio::test]
    async fn test_signed_in_header_greets_user() {
        let session = session();
        session.insert(session_keys::TOKEN, "jwt").await.unwrap();
        session.insert(session_keys::USER, user()).await.unwrap();

        assert_eq!(Layout::load(&session).await.user_name.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_user_without_token_shows_signed_out_header() {
        let session = session();
        session.insert(session_keys::USER, user()).await.unwrap();

        assert_eq!(Layout::load(&session).await.user_name, None);
    }

    #[test]
    fn test_cart_badge_class() {
        assert_eq!(CartBadge::new(0).class(), "badge badge-empty");
        assert_eq!(CartBadge::new(2).class(), "badge");
    }
}
