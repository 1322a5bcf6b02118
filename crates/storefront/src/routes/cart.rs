//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Plain form posts (no `HX-Request` header) are answered with a redirect
//! back to the cart page. Malformed forms are rejected with 400.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wenshop_core::{Cart, CartItem, CartItemId, ProductId};

use super::is_htmx;
use super::layout::{CartBadge, Layout};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::services::CartService;
use crate::services::auth::session_token;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub image_url: String,
    pub category_label: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub decrement_to: u32,
    pub increment_to: u32,
    pub can_decrement: bool,
    pub can_increment: bool,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i64(),
            product_id: item.product_id.as_i64(),
            name: item.product.name.clone(),
            image_url: item.product.image_url.clone(),
            category_label: item.product.category_label(),
            quantity: item.quantity,
            price: item.product.price.to_string(),
            line_price: item.line_total().to_string(),
            decrement_to: item.quantity.saturating_sub(1),
            increment_to: item.quantity.saturating_add(1),
            can_decrement: item.quantity > 1,
            can_increment: item.quantity < item.product.stock,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: CartItemId,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: CartItemId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub badge: CartBadge,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = CartService::new(&session).load().await;

    CartShowTemplate {
        layout: Layout::load(&session).await,
        cart: CartView::from(&cart),
    }
}

/// Add item to cart.
///
/// Returns the count badge with an HTMX trigger so other cart widgets refresh.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    form: std::result::Result<Form<AddToCartForm>, FormRejection>,
) -> Result<Response> {
    let Form(form) = form?;
    let token = session_token(&session).await;
    let cart = CartService::new(&session)
        .add(
            state.api(),
            form.product_id,
            form.quantity.unwrap_or(1),
            token.as_ref(),
        )
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &form.product_id.to_string())]),
    );

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            badge: CartBadge::new(cart.item_count()),
        },
    )
        .into_response())
}

/// Update cart line quantity; zero or less removes the line.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    form: std::result::Result<Form<UpdateCartForm>, FormRejection>,
) -> Result<Response> {
    let Form(form) = form?;
    let cart = CartService::new(&session)
        .update_quantity(form.item_id, form.quantity)
        .await?;
    Ok(cart_changed(&headers, &cart))
}

/// Remove a cart line.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    form: std::result::Result<Form<RemoveFromCartForm>, FormRejection>,
) -> Result<Response> {
    let Form(form) = form?;
    let cart = CartService::new(&session).remove(form.item_id).await?;
    Ok(cart_changed(&headers, &cart))
}

/// Empty the cart.
#[instrument(skip(session, headers))]
pub async fn clear(session: Session, headers: HeaderMap) -> Result<Response> {
    let cart = CartService::new(&session).clear().await?;
    Ok(cart_changed(&headers, &cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        badge: CartBadge::new(CartService::new(&session).count().await),
    }
}

/// Respond to a cart mutation: the refreshed items fragment for HTMX,
/// otherwise a redirect to the cart page.
fn cart_changed(headers: &HeaderMap, cart: &Cart) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(cart),
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wenshop_core::{Price, Product};

    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::new(4),
            name: "Headset".to_string(),
            description: String::new(),
            price: Price::from_cents(19_990),
            image_url: String::new(),
            category: "acessorios".to_string(),
            stock,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::default();
        cart.add(product(5), 3).unwrap();

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "R$ 599.70");

        let line = view.items.first().unwrap();
        assert_eq!(line.id, 4000);
        assert_eq!(line.line_price, "R$ 599.70");
        assert!(line.can_decrement);
        assert!(line.can_increment);
    }

    #[test]
    fn test_single_unit_line_cannot_decrement() {
        let mut cart = Cart::default();
        cart.add(product(1), 1).unwrap();

        let line = CartView::from(&cart).items.into_iter().next().unwrap();
        assert!(!line.can_decrement);
        assert!(!line.can_increment);
    }
}
