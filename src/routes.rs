// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const KEYWORDS: &str = "/api/keywords";
pub const KEYWORD_ITEM: &str = "/api/keywords/{id}";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI: &str = "/swagger-ui";
