//! Header quick search (HTMX dropdown).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};
use wenshop_core::catalog;

use super::products::ProductCardView;
use crate::services::auth::session_token;
use crate::state::AppState;

/// Quick search query parameters.
///
/// The header input submits itself as `search`; `q` is accepted too and wins
/// when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestQuery {
    pub q: Option<String>,
    pub search: Option<String>,
}

impl SuggestQuery {
    /// The trimmed search term.
    #[must_use]
    pub fn term(&self) -> &str {
        self.q
            .as_deref()
            .or(self.search.as_deref())
            .unwrap_or_default()
            .trim()
    }
}

/// Search dropdown fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SuggestTemplate {
    pub query: String,
    pub query_encoded: String,
    pub has_searched: bool,
    pub suggestions: Vec<ProductCardView>,
    pub total: usize,
    pub has_more: bool,
    pub error: Option<String>,
}

/// Render the quick-search dropdown for `q`.
///
/// A blank query renders an empty fragment so the dropdown closes.
#[instrument(skip(state, session))]
pub async fn suggest(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SuggestQuery>,
) -> impl IntoResponse {
    let term = query.term().to_string();
    let token = session_token(&session).await;

    let (products, error) = if term.is_empty() {
        (Vec::new(), None)
    } else {
        match state.api().list_products(token.as_ref()).await {
            Ok(products) => (products, None),
            Err(e) => {
                warn!(error = %e, "Quick search failed");
                (Vec::new(), Some(e.user_message()))
            }
        }
    };

    let search = catalog::quick_search(&products, &term);

    SuggestTemplate {
        query_encoded: urlencoding::encode(&term).into_owned(),
        query: term,
        has_searched: search.has_searched || error.is_some(),
        suggestions: search
            .suggestions()
            .iter()
            .copied()
            .map(ProductCardView::from)
            .collect(),
        total: search.results.len(),
        has_more: search.has_more(),
        error,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Uri;

    use super::*;

    fn parse(uri: &'static str) -> SuggestQuery {
        Query::<SuggestQuery>::try_from_uri(&Uri::from_static(uri))
            .unwrap()
            .0
    }

    #[test]
    fn test_term_from_either_parameter() {
        assert_eq!(parse("/search/suggest?q=%20cabo%20").term(), "cabo");
        assert_eq!(parse("/search/suggest?search=iphone").term(), "iphone");
        assert_eq!(parse("/search/suggest").term(), "");
    }

    #[test]
    fn test_q_wins_when_both_present() {
        assert_eq!(parse("/search/suggest?q=mac&search=galaxy").term(), "mac");
    }
}
