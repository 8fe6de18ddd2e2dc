//! Storage seam for keyword records.
//!
//! Handlers only talk to a [`KeywordStore`]; the Spanner-backed store is used
//! in production and the in-memory store for local development and tests.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Keyword;

pub use memory::MemoryKeywordStore;

/// Errors returned by a keyword store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another record already uses this text
    #[error("keyword `{0}` already exists")]
    Duplicate(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait KeywordStore: Send + Sync + 'static {
    /// All records in storage order
    async fn list(&self) -> StoreResult<Vec<Keyword>>;

    /// The record whose text matches exactly, if any
    async fn find_by_text(&self, text: &str) -> StoreResult<Option<Keyword>>;

    /// Persist a new record. Fails with [`StoreError::Duplicate`] if the text is taken.
    async fn insert(&self, keyword: &Keyword) -> StoreResult<()>;

    /// Remove a record by id. Succeeds even if the id was absent.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// A store whose every operation fails, as if the connection dropped
    pub struct FailingStore;

    fn dropped() -> StoreError {
        StoreError::Backend(anyhow::anyhow!("connection reset by peer"))
    }

    #[async_trait]
    impl KeywordStore for FailingStore {
        async fn list(&self) -> StoreResult<Vec<Keyword>> {
            Err(dropped())
        }

        async fn find_by_text(&self, _text: &str) -> StoreResult<Option<Keyword>> {
            Err(dropped())
        }

        async fn insert(&self, _keyword: &Keyword) -> StoreResult<()> {
            Err(dropped())
        }

        async fn delete(&self, _id: &str) -> StoreResult<()> {
            Err(dropped())
        }

        async fn health_check(&self) -> StoreResult<()> {
            Err(dropped())
        }
    }
}
