//! Domain models for the storefront.

pub mod order;
pub mod product;

/// Session keys used by the storefront.
///
/// Centralized to prevent typos when accessing session data.
pub mod session_keys {
    /// The serialized cart for the current visitor (JSON array of line items).
    pub const CART: &str = "cart";
}
