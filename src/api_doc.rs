use utoipa::OpenApi;

use crate::error::{HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{CreateKeywordRequest, Keyword};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "keyword-alerts-api",
        version = "0.1.0",
        description = "Keyword list with alert counts, backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Keyword,
            CreateKeywordRequest,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "keywords", description = "Keyword list operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;

    #[test]
    fn test_openapi_lists_keyword_routes() {
        let doc = ApiDoc::openapi();
        let keywords = doc.paths.paths.get(routes::KEYWORDS).unwrap();
        assert!(keywords.get.is_some());
        assert!(keywords.post.is_some());

        let item = doc.paths.paths.get(routes::KEYWORD_ITEM).unwrap();
        assert!(item.delete.is_some());
        assert!(doc.paths.paths.contains_key(routes::HEALTH));
    }

    #[test]
    fn test_keyword_schema_uses_camel_case_count() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let properties = &json["components"]["schemas"]["Keyword"]["properties"];
        assert!(properties.get("alertCount").is_some());
        assert!(properties.get("alert_count").is_none());
    }
}
