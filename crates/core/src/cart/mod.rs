//! Cart state container.
//!
//! A [`CartStore`] owns the product → quantity mapping of one cart and an
//! injected [`CartStorage`] adapter. Every mutation is applied to a copy of
//! the mapping, written through the adapter, and only then committed, so the
//! in-memory cart always equals the last persisted snapshot.
//!
//! Invariants:
//! - every stored quantity is in `1..=MAX_LINE_QUANTITY`
//! - every stored product id exists in the catalog
//! - `total() == Σ price × quantity` over all entries

mod storage;

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{Catalog, Product};
use crate::types::{Price, ProductId};

pub use storage::{CartSnapshot, CartStorage, MemoryStorage, SnapshotEntry, StorageError};

/// Highest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the catalog.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// The resulting line quantity would exceed [`MAX_LINE_QUANTITY`].
    #[error("quantity {requested} for product {product_id} exceeds the limit of {max}")]
    QuantityTooLarge {
        product_id: ProductId,
        requested: i64,
        max: u32,
    },

    /// The storage adapter failed; the cart is unchanged.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A cart entry joined with its catalog product, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// Owned cart state with write-through persistence.
#[derive(Debug)]
pub struct CartStore<S> {
    catalog: Arc<Catalog>,
    storage: S,
    entries: BTreeMap<ProductId, u32>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a cart from its last persisted snapshot.
    ///
    /// A missing snapshot yields an empty cart. Entries for products no
    /// longer in the catalog and zero quantities are dropped; quantities
    /// above the line limit are clamped. Nothing is written back until the
    /// next mutation.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be read.
    pub fn open(catalog: Arc<Catalog>, storage: S) -> Result<Self, CartError> {
        let snapshot = storage.load()?.unwrap_or_else(CartSnapshot::empty);

        let entries = snapshot
            .entries
            .into_iter()
            .filter(|e| e.quantity > 0 && catalog.contains(e.product_id))
            .map(|e| (e.product_id, e.quantity.min(MAX_LINE_QUANTITY)))
            .collect();

        Ok(Self {
            catalog,
            storage,
            entries,
        })
    }

    /// Change a product's quantity by `delta`.
    ///
    /// A positive delta on a product not yet in the cart creates the entry.
    /// A resulting quantity of zero or less removes it. Returns the new
    /// quantity (0 when removed).
    ///
    /// # Errors
    ///
    /// Returns `UnknownProduct` for ids outside the catalog,
    /// `QuantityTooLarge` past the line limit, and `Storage` if persisting
    /// fails. On error the cart is unchanged.
    pub fn add(&mut self, product_id: ProductId, delta: i64) -> Result<u32, CartError> {
        self.ensure_known(product_id)?;

        let current = self.quantity(product_id);
        if delta == 0 {
            return Ok(current);
        }

        let requested = i64::from(current).saturating_add(delta);
        if requested <= 0 {
            self.remove(product_id)?;
            return Ok(0);
        }

        let quantity = u32::try_from(requested)
            .ok()
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or(CartError::QuantityTooLarge {
                product_id,
                requested,
                max: MAX_LINE_QUANTITY,
            })?;

        let mut next = self.entries.clone();
        next.insert(product_id, quantity);
        self.commit(next)?;
        Ok(quantity)
    }

    /// Set a product's quantity; zero removes the entry.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::add`].
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<u32, CartError> {
        self.ensure_known(product_id)?;

        if quantity == 0 {
            self.remove(product_id)?;
            return Ok(0);
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                product_id,
                requested: i64::from(quantity),
                max: MAX_LINE_QUANTITY,
            });
        }
        if self.entries.get(&product_id) == Some(&quantity) {
            return Ok(quantity);
        }

        let mut next = self.entries.clone();
        next.insert(product_id, quantity);
        self.commit(next)?;
        Ok(quantity)
    }

    /// Remove a product from the cart.
    ///
    /// Returns `false` (without touching storage) if it was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if persisting fails.
    pub fn remove(&mut self, product_id: ProductId) -> Result<bool, CartError> {
        if !self.entries.contains_key(&product_id) {
            return Ok(false);
        }

        let mut next = self.entries.clone();
        next.remove(&product_id);
        self.commit(next)?;
        Ok(true)
    }

    /// Empty the cart and delete the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be removed.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.storage.clear()?;
        self.entries.clear();
        Ok(())
    }

    fn ensure_known(&self, product_id: ProductId) -> Result<(), CartError> {
        if self.catalog.contains(product_id) {
            Ok(())
        } else {
            Err(CartError::UnknownProduct(product_id))
        }
    }

    fn commit(&mut self, next: BTreeMap<ProductId, u32>) -> Result<(), CartError> {
        self.storage.save(&snapshot_of(&next))?;
        self.entries = next;
        Ok(())
    }
}

impl<S> CartStore<S> {
    /// Quantity of a product in the cart (0 if absent).
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.entries.get(&product_id).copied().unwrap_or(0)
    }

    /// Sum of price × quantity over all entries, in the catalog currency.
    #[must_use]
    pub fn total(&self) -> Price {
        let amount = self
            .entries
            .iter()
            .filter_map(|(id, qty)| {
                self.catalog
                    .get(*id)
                    .map(|p| p.price.amount * Decimal::from(*qty))
            })
            .sum();
        Price::new(amount, self.catalog.currency())
    }

    /// Total number of items (sum of quantities).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.entries.values().fold(0, |acc, q| acc.saturating_add(*q))
    }

    /// Cart lines ordered by product id.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine<'_>> {
        self.entries
            .iter()
            .filter_map(|(id, qty)| {
                self.catalog.get(*id).map(|product| CartLine {
                    product,
                    quantity: *qty,
                    line_total: product.price.times(*qty),
                })
            })
            .collect()
    }

    /// Current state as a storage snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        snapshot_of(&self.entries)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Release the storage adapter.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn snapshot_of(entries: &BTreeMap<ProductId, u32>) -> CartSnapshot {
    CartSnapshot {
        version: CartSnapshot::VERSION,
        entries: entries
            .iter()
            .map(|(product_id, quantity)| SnapshotEntry {
                product_id: *product_id,
                quantity: *quantity,
            })
            .collect(),
    }
}
