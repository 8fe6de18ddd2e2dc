use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

/// Which backend holds keyword records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Spanner,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spanner" => Ok(StoreBackend::Spanner),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("expected 'spanner' or 'memory', got '{}'", other),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Spanner => f.write_str("spanner"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Connection string, checked on first connect rather than at startup
    pub database_uri: Option<String>,
    pub spanner_emulator_host: Option<String>,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = lookup("KEYWORD_STORE")
            .unwrap_or_else(|| "spanner".to_string())
            .parse::<StoreBackend>()
            .context("KEYWORD_STORE must be either 'spanner' or 'memory'")?;

        let database_uri = lookup("SPANNER_DATABASE_URI").filter(|uri| !uri.trim().is_empty());

        let spanner_emulator_host = lookup("SPANNER_EMULATOR_HOST");

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store_backend,
            database_uri,
            spanner_emulator_host,
            service_port,
            service_host,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Keyword store: {}", self.store_backend);
        if self.store_backend == StoreBackend::Spanner {
            tracing::info!(
                "  Spanner emulator: {}",
                self.spanner_emulator_host
                    .as_deref()
                    .unwrap_or("disabled (using production)")
            );
            match &self.database_uri {
                Some(uri) => tracing::info!("  Spanner database: {}", uri),
                None => tracing::warn!(
                    "  SPANNER_DATABASE_URI is not set; requests will fail until it is"
                ),
            }
        }
        tracing::info!("  Service listening on: {}", self.bind_address());
    }
}
