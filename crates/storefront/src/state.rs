//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::db::OrderStore;
use crate::services::whatsapp::WhatsAppClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog and order stores behind their trait seams, so tests can run the
/// full router against in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    whatsapp: Option<WhatsAppClient>,
    /// Present in production; absent when running against in-memory stores.
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        whatsapp: Option<WhatsAppClient>,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                whatsapp,
                pool,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.orders.as_ref()
    }

    /// Get the WhatsApp client, if notifications are configured.
    #[must_use]
    pub fn whatsapp(&self) -> Option<&WhatsAppClient> {
        self.inner.whatsapp.as_ref()
    }

    /// Get the database connection pool, if one exists.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
