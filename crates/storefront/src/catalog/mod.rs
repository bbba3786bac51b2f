//! Catalog query resolution.
//!
//! Translates user-facing filter controls (URL query parameters, filter
//! buttons) into a normalized [`CatalogQuery`] a catalog store can execute,
//! and the inverse mapping used to render page headings from URL slugs.
//!
//! Resolution never rejects input: unknown categories or sort keys coerce to
//! their neutral defaults, and the neutral value `"all"` simply drops the
//! constraint. The resolver is a pure function; given equal specs it produces
//! equal queries, and every ordering carries an ascending-id tie break so a
//! fixed catalog always comes back in the same order.

pub mod cache;
pub mod memory;
pub mod sequence;
pub mod store;

pub use cache::CachedCatalog;
pub use memory::MemoryCatalog;
pub use sequence::{FetchTicket, QuerySequence};
pub use store::{CatalogError, CatalogStore};

use serde::{Deserialize, Serialize};

/// The neutral filter value: "apply no constraint on this axis".
pub const ALL: &str = "all";

/// Product categories known to the storefront.
///
/// Parsing is case-insensitive and total: anything unrecognized is `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Dresses,
    Suits,
    Outerwear,
    Accessories,
}

impl Category {
    /// Parse a category value, coercing unknown values to `All`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "dresses" => Self::Dresses,
            "suits" => Self::Suits,
            "outerwear" => Self::Outerwear,
            "accessories" => Self::Accessories,
            _ => Self::All,
        }
    }

    /// The lowercase query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Dresses => "dresses",
            Self::Suits => "suits",
            Self::Outerwear => "outerwear",
            Self::Accessories => "accessories",
        }
    }

    /// The display label used in page headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Collections",
            Self::Dresses => "Dresses",
            Self::Suits => "Suits",
            Self::Outerwear => "Outerwear",
            Self::Accessories => "Accessories",
        }
    }
}

/// Catalog orderings.
///
/// Parsing is total: unknown sort keys coerce to `Featured`, whose fallback
/// ordering is ascending id so repeated queries return the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    #[default]
    Featured,
    Newest,
    PriceAsc,
    PriceDesc,
}

impl Sort {
    /// Parse a sort value, coercing unknown values to `Featured`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "newest" => Self::Newest,
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::Featured,
        }
    }
}

/// Raw filter query parameters as they arrive from the URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub category: Option<String>,
    pub collaborator: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub sort: Option<String>,
    /// Hyphen-delimited product-name slug, e.g. `casual-skirt-suit`.
    pub product: Option<String>,
}

/// The resolved, validated set of catalog query parameters.
///
/// Immutable once built; construct a fresh one per navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub category: Category,
    /// `None` means the neutral value "all".
    pub collaborator: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub sort: Sort,
    /// Free-text hint derived from a URL slug.
    pub product_slug: Option<String>,
}

impl FilterSpec {
    /// Build a spec from URL query parameters.
    ///
    /// Missing, empty, and `"all"` values all collapse to the neutral value,
    /// and unknown category/sort values coerce to their defaults. This never
    /// fails.
    #[must_use]
    pub fn from_params(params: &FilterParams) -> Self {
        Self {
            category: params
                .category
                .as_deref()
                .map(Category::parse)
                .unwrap_or_default(),
            collaborator: non_neutral(params.collaborator.as_deref()),
            size: non_neutral(params.size.as_deref()),
            color: non_neutral(params.color.as_deref()),
            sort: params.sort.as_deref().map(Sort::parse).unwrap_or_default(),
            product_slug: non_neutral(params.product.as_deref()),
        }
    }

    /// Whether every field holds its neutral value.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Collapse missing, empty, and `"all"` to `None`.
fn non_neutral(value: Option<&str>) -> Option<String> {
    match value {
        None => None,
        Some(v) if v.is_empty() || v.eq_ignore_ascii_case(ALL) => None,
        Some(v) => Some(v.to_string()),
    }
}

/// The normalized query handed to a catalog store.
///
/// `None` fields constrain nothing. String values are lower-cased here so
/// stores can compare without caring about the user's casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub collaborator: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Case-insensitive substring match on product names.
    pub name_contains: Option<String>,
    pub sort: Sort,
}

/// Resolve a [`FilterSpec`] into the query a catalog store executes.
#[must_use]
pub fn resolve(spec: &FilterSpec) -> CatalogQuery {
    CatalogQuery {
        category: match spec.category {
            Category::All => None,
            other => Some(other.as_str().to_string()),
        },
        collaborator: spec.collaborator.as_deref().map(str::to_lowercase),
        size: spec.size.as_deref().map(str::to_lowercase),
        color: spec.color.as_deref().map(str::to_lowercase),
        name_contains: spec.product_slug.as_deref().map(slug_to_title),
        sort: spec.sort,
    }
}

/// Reconstruct a product-name phrase from its URL slug.
///
/// The slug encoding lower-cases the name and joins words with hyphens;
/// this is the exact inverse: `straight-cut-long-dress` becomes
/// "Straight Cut Long Dress".
#[must_use]
pub fn slug_to_title(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The human-readable heading for a filtered collections page.
///
/// A product slug wins over a category; a non-neutral collaborator appends
/// a "modeled by" suffix.
#[must_use]
pub fn page_heading(spec: &FilterSpec) -> String {
    let mut heading = spec
        .product_slug
        .as_deref()
        .map_or_else(|| spec.category.label().to_string(), slug_to_title);

    if let Some(collaborator) = spec.collaborator.as_deref() {
        heading.push_str(" modeled by ");
        heading.push_str(&slug_to_title(collaborator));
    }

    heading
}
