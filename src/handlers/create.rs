use crate::error::ApiError;
use crate::models::{CreateKeywordRequest, Keyword};
use crate::routes;
use crate::state::AppState;
use crate::store::StoreError;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

/// POST /api/keywords handler - Add a keyword
///
/// The text must be 3 to 50 UTF-16 code units and not already stored. New keywords
/// start with an alert count of zero.
#[utoipa::path(
    post,
    path = routes::KEYWORDS,
    request_body = CreateKeywordRequest,
    responses(
        (status = 201, description = "Keyword created", body = Keyword),
        (status = 400, description = "Invalid or duplicate keyword text", body = String, content_type = "text/plain"),
        (status = 500, description = "Database error", body = String, content_type = "text/plain")
    ),
    tag = "keywords"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateKeywordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Keyword>), ApiError> {
    let store = state.store().await?;

    // An unreadable body carries no usable text
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected keyword body: {}", rejection);
        ApiError::InvalidKeywordText
    })?;
    let text = request.into_text()?;

    let existing = store
        .find_by_text(&text)
        .await
        .map_err(|e| ApiError::CreateFailed(e.into()))?;
    if existing.is_some() {
        tracing::info!("Keyword already exists: {}", text);
        return Err(ApiError::KeywordExists);
    }

    let keyword = Keyword::new(text);
    match store.insert(&keyword).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(text)) => {
            tracing::info!("Keyword inserted concurrently: {}", text);
            return Err(ApiError::KeywordExists);
        }
        Err(StoreError::Backend(e)) => return Err(ApiError::CreateFailed(e)),
    }

    tracing::info!("Created keyword '{}' with id: {}", keyword.text, keyword.id);
    Ok((StatusCode::CREATED, Json(keyword)))
}
