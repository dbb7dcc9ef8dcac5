//! Cart service.
//!
//! Each request opens the visitor's cart from its file, applies at most one
//! mutation and drops the store. File I/O runs on the blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serendib_core::{CartError, CartStore, Catalog, Price, ProductId, SessionId};
use tower_sessions::Session;

use crate::error::Result;
use crate::models::session::keys;
use crate::state::AppState;
use crate::storage::LocalStorage;

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineSummary {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Owned view of a cart after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub entries: Vec<CartLineSummary>,
    pub count: u32,
    pub total: Price,
}

impl CartSummary {
    fn of(store: &CartStore<LocalStorage>) -> Self {
        Self {
            entries: store
                .lines()
                .into_iter()
                .map(|line| CartLineSummary {
                    product_id: line.product.id,
                    name: line.product.name.clone(),
                    image: line.product.image.clone(),
                    quantity: line.quantity,
                    unit_price: line.product.price,
                    line_total: line.line_total,
                })
                .collect(),
            count: store.count(),
            total: store.total(),
        }
    }
}

/// Opens per-visitor carts stored under the data directory.
#[derive(Clone)]
pub struct CartService {
    catalog: Arc<Catalog>,
    dir: PathBuf,
}

impl CartService {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            catalog: Arc::clone(state.catalog()),
            dir: state.data_dir().to_path_buf(),
        }
    }

    /// Current contents of the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read.
    pub async fn view(&self, key: SessionId) -> Result<CartSummary> {
        self.with_cart(key, |_| Ok(())).await
    }

    /// Change a product's quantity by a signed delta.
    ///
    /// # Errors
    ///
    /// Returns the cart error, or a storage error if persisting fails.
    pub async fn add(&self, key: SessionId, product_id: ProductId, delta: i64) -> Result<CartSummary> {
        self.with_cart(key, move |cart| cart.add(product_id, delta).map(drop))
            .await
    }

    /// Set a product's quantity; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns the cart error, or a storage error if persisting fails.
    pub async fn set_quantity(
        &self,
        key: SessionId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartSummary> {
        self.with_cart(key, move |cart| cart.set_quantity(product_id, quantity).map(drop))
            .await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub async fn remove(&self, key: SessionId, product_id: ProductId) -> Result<CartSummary> {
        self.with_cart(key, move |cart| cart.remove(product_id).map(drop))
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be deleted.
    pub async fn clear(&self, key: SessionId) -> Result<CartSummary> {
        self.with_cart(key, CartStore::clear).await
    }

    async fn with_cart<F>(&self, key: SessionId, op: F) -> Result<CartSummary>
    where
        F: FnOnce(&mut CartStore<LocalStorage>) -> std::result::Result<(), CartError>
            + Send
            + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        let storage = LocalStorage::new(&self.dir, &key);

        let summary = tokio::task::spawn_blocking(move || {
            let mut cart = CartStore::open(catalog, storage)?;
            op(&mut cart)?;
            Ok::<_, CartError>(CartSummary::of(&cart))
        })
        .await??;

        Ok(summary)
    }
}

/// The visitor's cart key, created on first use.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn cart_key(session: &Session) -> Result<SessionId> {
    let existing = session
        .get::<String>(keys::CART_KEY)
        .await?
        .and_then(|raw| SessionId::parse(&raw).ok());

    if let Some(key) = existing {
        return Ok(key);
    }

    let key = SessionId::generate();
    session.insert(keys::CART_KEY, key.as_str()).await?;
    tracing::debug!(cart_key = %key, "Assigned cart key");
    Ok(key)
}
