use crate::error::{HealthResponse, UnhealthyResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

const UNHEALTHY_MESSAGE: &str = "Cannot connect to database";

/// GET /health handler - Health check endpoint
///
/// Connects to the store if needed and runs its health check.
/// Returns 200 OK if the database is reachable, 503 Service Unavailable otherwise.
/// The cause of a failure is logged, not returned.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    let unhealthy = |detail: String| {
        tracing::error!("Health check failed: {}", detail);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(UnhealthyResponse {
                status: "unhealthy".to_string(),
                error: UNHEALTHY_MESSAGE.to_string(),
            }),
        )
    };

    let store = state
        .database
        .ensure_ready()
        .await
        .map_err(|e| unhealthy(format!("{:#}", e)))?;

    store
        .health_check()
        .await
        .map_err(|e| unhealthy(format!("{:#}", anyhow::Error::from(e))))?;

    tracing::debug!("Health check passed");
    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    ))
}
