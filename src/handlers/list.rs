use crate::error::ApiError;
use crate::models::Keyword;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /api/keywords handler - List every keyword
///
/// Records come back unfiltered, in the order the store holds them.
#[utoipa::path(
    get,
    path = routes::KEYWORDS,
    responses(
        (status = 200, description = "All keywords", body = [Keyword]),
        (status = 500, description = "Database error", body = String, content_type = "text/plain")
    ),
    tag = "keywords"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Keyword>>), ApiError> {
    let store = state.store().await?;

    let keywords = store
        .list()
        .await
        .map_err(|e| ApiError::FetchFailed(e.into()))?;

    tracing::info!("Listed {} keywords", keywords.len());
    Ok((StatusCode::OK, Json(keywords)))
}
