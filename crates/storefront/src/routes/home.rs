//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::{instrument, warn};
use wenshop_core::{Product, catalog};

use super::layout::Layout;
use super::products::ProductCardView;
use crate::filters;
use crate::services::auth::session_token;
use crate::state::AppState;

/// A category tile on the home page.
#[derive(Clone)]
pub struct CategoryTile {
    pub slug: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Categories promoted on the home page.
const POPULAR_CATEGORIES: [CategoryTile; 4] = [
    CategoryTile {
        slug: "smartphones",
        label: "Smartphones",
        icon: "📱",
    },
    CategoryTile {
        slug: "laptops",
        label: "Laptops",
        icon: "💻",
    },
    CategoryTile {
        slug: "acessorios",
        label: "Acessórios",
        icon: "🎧",
    },
    CategoryTile {
        slug: "games",
        label: "Games",
        icon: "🎮",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<ProductCardView>,
    pub categories: Vec<CategoryTile>,
    pub error: Option<String>,
}

/// Display the home page.
///
/// Shows the backend's featured list, falling back to the first products of
/// the catalog when that list is unavailable or empty.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let token = session_token(&session).await;
    let api = state.api();

    let featured: Result<Vec<Product>, _> = match api.featured_products(token.as_ref()).await {
        Ok(products) if !products.is_empty() => Ok(products),
        first => {
            if let Err(e) = first {
                warn!(error = %e, "Featured products unavailable, using catalog");
            }
            api.list_products(token.as_ref())
                .await
                .map(|all| catalog::featured(&all).to_vec())
        }
    };

    let (featured, error) = match featured {
        Ok(products) => (products.iter().map(ProductCardView::from).collect(), None),
        Err(e) => {
            warn!(error = %e, "Failed to load products for home page");
            (Vec::new(), Some(e.user_message()))
        }
    };

    HomeTemplate {
        layout: Layout::load(&session).await,
        featured,
        categories: POPULAR_CATEGORIES.to_vec(),
        error,
    }
}
