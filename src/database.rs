//! Lazily established, process-wide store handle.
//!
//! The first request that needs the store connects it; every later request
//! reuses the same handle. Concurrent first requests wait on a single
//! connection attempt. A failed attempt leaves the cell empty so the next
//! request tries again.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::OnceCell;

use crate::config::{Config, StoreBackend};
use crate::spanner::SpannerKeywordStore;
use crate::store::{KeywordStore, MemoryKeywordStore};

#[derive(Clone)]
pub struct Database {
    config: Arc<Config>,
    store: Arc<OnceCell<Arc<dyn KeywordStore>>>,
}

impl Database {
    /// A handle that connects on first use
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            store: Arc::new(OnceCell::new()),
        }
    }

    /// A handle that is already connected to `store`
    #[cfg(test)]
    pub fn with_store(config: Arc<Config>, store: Arc<dyn KeywordStore>) -> Self {
        Self {
            config,
            store: Arc::new(OnceCell::new_with(Some(store))),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.store.initialized()
    }

    /// Return the store, connecting first if no connection exists yet
    pub async fn ensure_ready(&self) -> Result<Arc<dyn KeywordStore>> {
        let store = self
            .store
            .get_or_try_init(|| connect(&self.config))
            .await?;
        Ok(Arc::clone(store))
    }
}

async fn connect(config: &Config) -> Result<Arc<dyn KeywordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory keyword store");
            Ok(Arc::new(MemoryKeywordStore::new()))
        }
        StoreBackend::Spanner => {
            let uri = config
                .database_uri
                .as_deref()
                .context("SPANNER_DATABASE_URI environment variable is required")?;
            let store = SpannerKeywordStore::connect(uri, config.spanner_emulator_host.as_deref())
                .await
                .context("Database connection failed")?;
            Ok(Arc::new(store))
        }
    }
}
