//! Storefront-side models.
//!
//! Domain types live in `wenshop-core`; this module only describes how they
//! are laid out in the visitor session.

pub mod session;

pub use session::keys as session_keys;
