//! Session-related types.
//!
//! The session replaces the browser's local storage: each visitor gets the
//! same three entries the shop has always used, stored as verbatim JSON.

/// Session keys for visitor data.
pub mod keys {
    /// Backend bearer token for the signed-in user (JSON string).
    pub const TOKEN: &str = "token";

    /// The signed-in [`wenshop_core::User`].
    pub const USER: &str = "user";

    /// The visitor's cart lines (JSON array of [`wenshop_core::CartItem`]).
    pub const CART_ITEMS: &str = "cartItems";
}
