use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode};
use uuid::Uuid;

/// DELETE /api/keywords/{id} handler - Remove a keyword
///
/// Deleting an id that does not exist still succeeds. An id that is not a
/// UUID cannot name a stored keyword and is reported as a failed delete.
#[utoipa::path(
    delete,
    path = routes::KEYWORD_ITEM,
    params(
        ("id" = String, Path, description = "Identifier of the keyword")
    ),
    responses(
        (status = 204, description = "Keyword deleted, or never existed"),
        (status = 500, description = "Malformed id or database error", body = String, content_type = "text/plain")
    ),
    tag = "keywords"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store().await?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        ApiError::DeleteFailed(anyhow::Error::new(e).context(format!("Invalid keyword id '{}'", id_str)))
    })?;

    store
        .delete(&id.to_string())
        .await
        .map_err(|e| ApiError::DeleteFailed(e.into()))?;

    tracing::info!("Deleted keyword with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::create_router;
    use crate::models::Keyword;
    use crate::store::testing::FailingStore;
    use crate::store::{KeywordStore, MemoryKeywordStore};
    use axum::{body::Body, http::Request, Router};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn setup_test_app(store: Arc<MemoryKeywordStore>) -> Router {
        create_router(AppState::with_store(store))
    }

    async fn delete_keyword(app: Router, id: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/keywords/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_delete_existing_keyword() {
        let store = Arc::new(MemoryKeywordStore::new());
        let keep = Keyword::new("bitcoin");
        let remove = Keyword::new("alpha");
        store.insert(&keep).await.unwrap();
        store.insert(&remove).await.unwrap();

        let (status, body) = delete_keyword(setup_test_app(store.clone()), &remove.id).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
        assert_eq!(store.list().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_delete_missing_keyword_is_idempotent() {
        let store = Arc::new(MemoryKeywordStore::new());

        let id = Uuid::new_v4().to_string();
        let (status, body) = delete_keyword(setup_test_app(store.clone()), &id).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (status, _) = delete_keyword(setup_test_app(store), &id).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_malformed_id() {
        let store = Arc::new(MemoryKeywordStore::new());
        store.insert(&Keyword::new("alpha")).await.unwrap();

        let (status, body) = delete_keyword(setup_test_app(store.clone()), "not-a-uuid").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Unable to delete keyword.");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_database_error() {
        let app = create_router(AppState::with_store(Arc::new(FailingStore)));

        let (status, body) = delete_keyword(app, &Uuid::new_v4().to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"Unable to delete keyword.");
    }
}
