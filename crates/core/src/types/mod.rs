//! Core types for WenShop.
//!
//! This module provides the storefront's DTOs and type-safe wrappers for
//! common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use cart::{Cart, CartError, CartItem};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{Product, capitalize_first};
pub use user::{AuthState, LoginCredentials, RegisterData, User};
