//! WenShop Core - Shared domain types and pure storefront logic.
//!
//! This crate provides the types and rules used by the storefront:
//! - `storefront` - Server-rendered shop UI backed by the remote REST API
//! - `integration-tests` - End-to-end flows against a mock backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session access. Persistence and network calls live in the
//! storefront crate, which feeds data through the functions here.
//!
//! # Modules
//!
//! - [`types`] - Products, cart, users, auth state, and newtype wrappers
//! - [`catalog`] - Listing filters, quick search, and category extraction
//! - [`validation`] - Login and registration form rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;
pub mod validation;

pub use types::*;
