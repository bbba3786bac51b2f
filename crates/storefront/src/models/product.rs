//! Catalog product model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ramadhane_core::{Price, ProductId};

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Image URL.
    pub url: String,
    /// Whether this is the main (listing) image.
    pub is_main: bool,
}

/// A catalog product with its variant axes and images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Regular price.
    pub price: Price,
    /// Discounted price, when the product is on sale.
    pub sale_price: Option<Price>,
    /// Category name as stored (display case, e.g. "Suits").
    pub category: String,
    /// The collaborator who modeled this product, if any.
    pub collaborator: Option<String>,
    /// Available colors. Empty when the product has no color axis.
    pub colors: Vec<String>,
    /// Available sizes. Empty when the product has no size axis.
    pub sizes: Vec<String>,
    pub images: Vec<ProductImage>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays: sale price when present, regular
    /// price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.sale_price.unwrap_or(self.price)
    }

    /// The main image URL, falling back to the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|img| img.is_main)
            .or_else(|| self.images.first())
            .map(|img| img.url.as_str())
    }

    /// Whether a size must be chosen before this product can go in a cart.
    #[must_use]
    pub fn requires_size(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Whether a color must be chosen before this product can go in a cart.
    #[must_use]
    pub fn requires_color(&self) -> bool {
        !self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sale_price: Option<Price>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Casual Skirt Suit - Chocolate".to_string(),
            description: None,
            price: Price::from_minor(12999, 2),
            sale_price,
            category: "Suits".to_string(),
            collaborator: Some("Emna".to_string()),
            colors: vec!["Chocolate".to_string()],
            sizes: vec!["S".to_string(), "M".to_string()],
            images: vec![
                ProductImage {
                    url: "/products/1/detail.jpg".to_string(),
                    is_main: false,
                },
                ProductImage {
                    url: "/products/1/main.jpg".to_string(),
                    is_main: true,
                },
            ],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_price_prefers_sale_price() {
        assert_eq!(
            product(None).effective_price(),
            Price::from_minor(12999, 2)
        );
        assert_eq!(
            product(Some(Price::from_minor(9999, 2))).effective_price(),
            Price::from_minor(9999, 2)
        );
    }

    #[test]
    fn test_primary_image_prefers_main_flag() {
        assert_eq!(product(None).primary_image(), Some("/products/1/main.jpg"));

        let mut no_main = product(None);
        for img in &mut no_main.images {
            img.is_main = false;
        }
        assert_eq!(no_main.primary_image(), Some("/products/1/detail.jpg"));

        no_main.images.clear();
        assert_eq!(no_main.primary_image(), None);
    }

    #[test]
    fn test_serializes_camel_case() {
        // The whole JSON API is camelCase; products are no exception.
        let json = serde_json::to_value(product(Some(Price::from_minor(9999, 2))))
            .expect("serialize");

        assert_eq!(json["salePrice"], "99.99");
        assert_eq!(json["images"][1]["isMain"], true);
        assert!(json["createdAt"].is_string());
        assert!(json.get("sale_price").is_none());
        assert!(json["images"][0].get("is_main").is_none());
    }

    #[test]
    fn test_variant_axes() {
        let p = product(None);
        assert!(p.requires_size());
        assert!(p.requires_color());

        let mut accessory = product(None);
        accessory.sizes.clear();
        accessory.colors.clear();
        assert!(!accessory.requires_size());
        assert!(!accessory.requires_color());
    }
}
