use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Methods advertised in the `Allow` header of a 405 response
pub const ALLOWED_METHODS: &str = "GET, POST, DELETE";

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Error type for the keyword endpoints
///
/// Every variant maps to a fixed plain-text body. Underlying database errors
/// are logged here and never written to the response.
#[derive(Debug)]
pub enum ApiError {
    /// Keyword text missing or outside 3..=50 characters
    InvalidKeywordText,
    /// A keyword with the same text is already stored
    KeywordExists,
    /// The store could not be reached
    ConnectionFailed(anyhow::Error),
    FetchFailed(anyhow::Error),
    CreateFailed(anyhow::Error),
    DeleteFailed(anyhow::Error),
    /// Method other than GET, POST or DELETE
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidKeywordText | ApiError::KeywordExists => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ConnectionFailed(_)
            | ApiError::FetchFailed(_)
            | ApiError::CreateFailed(_)
            | ApiError::DeleteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidKeywordText => "Keyword text must be between 3 and 50 characters.",
            ApiError::KeywordExists => "Keyword already exists.",
            ApiError::ConnectionFailed(_) => "Database connection failed.",
            ApiError::FetchFailed(_) => "Unable to fetch keywords.",
            ApiError::CreateFailed(_) => "Unable to add keyword.",
            ApiError::DeleteFailed(_) => "Unable to delete keyword.",
            ApiError::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        match &self {
            ApiError::ConnectionFailed(err) => {
                tracing::error!("Database connection error: {:#}", err)
            }
            ApiError::FetchFailed(err) => tracing::error!("Error fetching keywords: {:#}", err),
            ApiError::CreateFailed(err) => tracing::error!("Error adding keyword: {:#}", err),
            ApiError::DeleteFailed(err) => tracing::error!("Error deleting keyword: {:#}", err),
            _ => {}
        }

        if let ApiError::MethodNotAllowed = self {
            return (status, [(header::ALLOW, ALLOWED_METHODS)], message).into_response();
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_request() {
        let response = ApiError::InvalidKeywordText.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Keyword text must be between 3 and 50 characters."
        );

        let response = ApiError::KeywordExists.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Keyword already exists.");
    }

    #[tokio::test]
    async fn test_database_errors_do_not_leak_detail() {
        let response =
            ApiError::FetchFailed(anyhow::anyhow!("secret connection detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, "Unable to fetch keywords.");
        assert!(!body.contains("secret"));
    }

    #[tokio::test]
    async fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(header::ALLOW).unwrap(),
            "GET, POST, DELETE"
        );
        assert_eq!(body_text(response).await, "Method Not Allowed");
    }

    #[test]
    fn test_plain_text_content_type() {
        let response = ApiError::KeywordExists.into_response();
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }
}
