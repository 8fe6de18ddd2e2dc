use crate::config::Config;
use crate::database::Database;
use crate::error::ApiError;
use crate::store::KeywordStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        Self {
            database: Database::new(config.clone()),
            config,
        }
    }

    /// The connected keyword store, or a 500 if it cannot be reached
    pub async fn store(&self) -> Result<Arc<dyn KeywordStore>, ApiError> {
        if !self.database.is_ready() {
            tracing::info!("Connecting to {} keyword store", self.config.store_backend);
        }
        self.database
            .ensure_ready()
            .await
            .map_err(ApiError::ConnectionFailed)
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by an already-connected store
    pub fn with_store(store: Arc<dyn KeywordStore>) -> Self {
        use crate::config::StoreBackend;

        let config = Arc::new(Config {
            store_backend: StoreBackend::Memory,
            database_uri: None,
            spanner_emulator_host: None,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        });
        Self {
            database: Database::with_store(config.clone(), store),
            config,
        }
    }

    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(crate::store::MemoryKeywordStore::new()))
    }
}
