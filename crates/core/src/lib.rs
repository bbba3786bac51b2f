//! Shared types for the Ramadhane storefront.
//!
//! This crate holds the small vocabulary shared by the storefront binary and
//! the integration tests: newtype entity IDs and the decimal price type.
//! It deliberately has no web or database logic; the optional `postgres`
//! feature only adds sqlx codecs for the ID types.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::id::{OrderId, ProductId};
pub use types::price::Price;
