use crate::error::ApiError;

/// Fallback for any method the keyword routes do not serve
///
/// Always 405 with `Allow: GET, POST, DELETE`, whichever keyword route was hit.
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
