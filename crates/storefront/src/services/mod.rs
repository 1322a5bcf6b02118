//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Sign-in, registration, and sign-out against the REST backend
//! - `cart` - Session-persisted shopping cart
//!
//! Both services operate on the visitor [`tower_sessions::Session`], which
//! holds the `token`, `user`, and `cartItems` entries.

pub mod auth;
pub mod cart;

pub use auth::{AuthError, AuthService};
pub use cart::CartService;
