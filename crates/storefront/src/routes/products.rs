//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};
use wenshop_core::catalog::{self, ProductFilter};
use wenshop_core::{Product, ProductId, capitalize_first};

use super::layout::Layout;
use crate::api::ApiError;
use crate::error::AppError;
use crate::filters;
use crate::services::auth::session_token;
use crate::state::AppState;

/// Product card data for grids and the search dropdown.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub category_label: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            category_label: product.category_label(),
            in_stock: product.in_stock(),
        }
    }
}

/// Product detail data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub list_price: String,
    pub discount_percent: u32,
    pub image_url: String,
    /// Listing URL filtered to this product's category.
    pub category_href: String,
    pub category_label: String,
    pub stock: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            list_price: product.price.list_price().to_string(),
            discount_percent: product.price.discount_percent(),
            image_url: product.image_url.clone(),
            category_href: format!(
                "/products?category={}",
                urlencoding::encode(&product.category)
            ),
            category_label: product.category_label(),
            stock: product.stock,
            in_stock: product.in_stock(),
        }
    }
}

/// An entry in the category selector.
#[derive(Clone)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryOption>,
    pub search: String,
    pub category: String,
    pub category_label: String,
    pub filters_active: bool,
    pub result_count: usize,
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetailView,
}

/// Unknown product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub layout: Layout,
}

/// Display the product listing, filtered by `search` and `category`.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductsQuery>,
) -> impl IntoResponse {
    let filter = ProductFilter::new(query.search.as_deref(), query.category.as_deref());
    let token = session_token(&session).await;

    let (products, error) = match state.api().list_products(token.as_ref()).await {
        Ok(products) => (products, None),
        Err(e) => {
            warn!(error = %e, "Failed to load product listing");
            (Vec::new(), Some(e.user_message()))
        }
    };

    let selected = filter.category().unwrap_or_default().to_lowercase();
    let categories = catalog::categories(&products)
        .into_iter()
        .map(|category| CategoryOption {
            value: category.to_string(),
            label: capitalize_first(category),
            selected: category.to_lowercase() == selected,
        })
        .collect();

    let matching: Vec<ProductCardView> = filter
        .apply(&products)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    let search = filter.search().unwrap_or_default().to_string();

    ProductsIndexTemplate {
        layout: Layout::load(&session).await.with_search(search.clone()),
        result_count: matching.len(),
        products: matching,
        categories,
        search,
        category: filter.category().unwrap_or_default().to_string(),
        category_label: capitalize_first(filter.category().unwrap_or_default()),
        filters_active: filter.is_active(),
        error,
    }
}

/// Display the product detail page.
///
/// Ids that do not parse, and ids the backend does not know, render the
/// not-found page with a 404.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = raw_id.parse::<ProductId>() else {
        return Ok(not_found(&session).await);
    };

    let token = session_token(&session).await;
    let product = match state.api().get_product(id, token.as_ref()).await {
        Ok(product) => product,
        Err(ApiError::NotFound(_)) => return Ok(not_found(&session).await),
        Err(e) => return Err(e.into()),
    };

    Ok(ProductShowTemplate {
        layout: Layout::load(&session).await,
        product: ProductDetailView::from(&product),
    }
    .into_response())
}

async fn not_found(session: &Session) -> Response {
    (
        StatusCode::NOT_FOUND,
        ProductNotFoundTemplate {
            layout: Layout::load(session).await,
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wenshop_core::Price;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(3),
            name: "MacBook Air".to_string(),
            description: "Chip M3".to_string(),
            price: Price::from_cents(999_990),
            image_url: "https://img.example/mba.png".to_string(),
            category: "laptops".to_string(),
            stock: 0,
        }
    }

    #[test]
    fn test_detail_view_prices() {
        let view = ProductDetailView::from(&product());
        assert_eq!(view.price, "R$ 9999.90");
        assert_eq!(view.list_price, "R$ 11999.88");
        assert_eq!(view.discount_percent, 17);
        assert_eq!(view.category_label, "Laptops");
        assert!(!view.in_stock);
    }

    #[test]
    fn test_card_view() {
        let view = ProductCardView::from(&product());
        assert_eq!(view.id, 3);
        assert_eq!(view.price, "R$ 9999.90");
    }

    #[test]
    fn test_detail_category_link_is_url_encoded() {
        let mut product = product();
        product.category = "cama & banho #1".to_string();

        let view = ProductDetailView::from(&product);
        assert_eq!(view.category_href, "/products?category=cama%20%26%20banho%20%231");
    }
}
