//! Immutable product catalog.
//!
//! The catalog is loaded once from a static JSON list and shared read-only
//! (behind an `Arc`) by every cart store and page renderer.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::MAX_LINE_QUANTITY;
use crate::types::{CurrencyCode, Price, ProductId, Rating};

/// Built-in catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The JSON document could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share the same id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// Products are priced in more than one currency.
    #[error("product {id} is priced in {found:?}, catalog currency is {expected:?}")]
    MixedCurrency {
        id: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A full cart of this product and every one before it would overflow
    /// the decimal range.
    #[error("product {0} pushes the catalog past the largest cart total")]
    PriceTooLarge(ProductId),

    /// A product has an empty name.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
}

/// A product offered in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL or path relative to the site root.
    pub image: String,
    pub category: String,
    pub rating: Rating,
}

/// Read-only product list with lookup by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    currency: CurrencyCode,
}

impl Catalog {
    /// Build a catalog from a product list, preserving its order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if ids are duplicated, currencies are mixed,
    /// a price is negative or a name is blank. Prices must also be small
    /// enough that a cart holding [`MAX_LINE_QUANTITY`] of every product has
    /// a representable total.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let currency = products
            .first()
            .map(|p| p.price.currency_code)
            .unwrap_or_default();
        let max_quantity = Decimal::from(MAX_LINE_QUANTITY);
        let mut price_sum = Decimal::ZERO;

        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if product.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(product.id));
            }
            if product.price.amount.is_sign_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }
            price_sum = price_sum
                .checked_add(product.price.amount)
                .filter(|sum| sum.checked_mul(max_quantity).is_some())
                .ok_or(CatalogError::PriceTooLarge(product.id))?;
            if product.price.currency_code != currency {
                return Err(CatalogError::MixedCurrency {
                    id: product.id,
                    expected: currency,
                    found: product.price.currency_code,
                });
            }
            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self {
            products,
            index,
            currency,
        })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and the validation
    /// errors of [`Catalog::new`] otherwise.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data is invalid, which the test suite guards.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&i| self.products.get(i))
    }

    /// Whether the catalog has a product with this id.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products in the given category (case-insensitive), in catalog order.
    #[must_use]
    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Currency every product is priced in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
