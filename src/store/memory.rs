use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeywordStore, StoreError, StoreResult};
use crate::models::Keyword;

/// Process-local store; records live in insertion order
#[derive(Debug, Default)]
pub struct MemoryKeywordStore {
    keywords: RwLock<Vec<Keyword>>,
}

impl MemoryKeywordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeywordStore for MemoryKeywordStore {
    async fn list(&self) -> StoreResult<Vec<Keyword>> {
        Ok(self.keywords.read().await.clone())
    }

    async fn find_by_text(&self, text: &str) -> StoreResult<Option<Keyword>> {
        let keywords = self.keywords.read().await;
        Ok(keywords.iter().find(|k| k.text == text).cloned())
    }

    async fn insert(&self, keyword: &Keyword) -> StoreResult<()> {
        let mut keywords = self.keywords.write().await;
        if keywords.iter().any(|k| k.text == keyword.text) {
            return Err(StoreError::Duplicate(keyword.text.clone()));
        }
        keywords.push(keyword.clone());
        tracing::debug!("Inserted keyword with id: {}", keyword.id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut keywords = self.keywords.write().await;
        let before = keywords.len();
        keywords.retain(|k| k.id != id);
        tracing::debug!("Deleted {} keyword(s) with id: {}", before - keywords.len(), id);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_empty() {
        let store = MemoryKeywordStore::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let store = MemoryKeywordStore::new();
        for text in ["gamma", "alpha", "beta"] {
            store.insert(&Keyword::new(text)).await.unwrap();
        }

        let texts: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.text)
            .collect();
        assert_eq!(texts, vec!["gamma", "alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_insert_duplicate_text() {
        let store = MemoryKeywordStore::new();
        store.insert(&Keyword::new("alpha")).await.unwrap();

        let result = store.insert(&Keyword::new("alpha")).await;
        assert!(matches!(result, Err(StoreError::Duplicate(text)) if text == "alpha"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_text_is_exact() {
        let store = MemoryKeywordStore::new();
        let keyword = Keyword::new("alpha");
        store.insert(&keyword).await.unwrap();

        assert_eq!(store.find_by_text("alpha").await.unwrap(), Some(keyword));
        assert_eq!(store.find_by_text("Alpha").await.unwrap(), None);
        assert_eq!(store.find_by_text("alph").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let store = MemoryKeywordStore::new();
        let keyword = Keyword::new("alpha");
        store.insert(&keyword).await.unwrap();

        store.delete(&keyword.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        // deleting again is not an error
        store.delete(&keyword.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_inserts_keep_one() {
        let store = std::sync::Arc::new(MemoryKeywordStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(&Keyword::new("racing")).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
