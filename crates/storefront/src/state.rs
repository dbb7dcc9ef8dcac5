//! Application state shared across handlers.

use std::path::Path;
use std::sync::Arc;

use serendib_core::{Catalog, ChatRelay};

use crate::config::StorefrontConfig;
use crate::rasa::{RasaClient, RasaError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// product catalog, the chat relay and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    relay: ChatRelay<RasaClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Rasa HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, RasaError> {
        let rasa = RasaClient::new(&config.rasa)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Arc::new(catalog),
                relay: ChatRelay::new(rasa),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.inner.catalog
    }

    /// Get the chat relay.
    #[must_use]
    pub fn relay(&self) -> &ChatRelay<RasaClient> {
        &self.inner.relay
    }

    /// Get the Rasa client behind the relay.
    #[must_use]
    pub fn rasa(&self) -> &RasaClient {
        self.inner.relay.backend()
    }

    /// Directory holding persisted carts.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.inner.config.data_dir
    }
}
