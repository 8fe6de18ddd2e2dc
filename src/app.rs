use axum::{
    Router,
    routing::{delete, get},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_handler, delete_handler, health_handler, list_handler, method_not_allowed_handler,
};
use crate::routes;
use crate::state::AppState;

/// Build the router with every route and the request tracing layer
///
/// HEAD is routed to the 405 fallback explicitly; otherwise axum would answer
/// it with the GET handler.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(
            routes::KEYWORDS,
            get(list_handler)
                .post(create_handler)
                .head(method_not_allowed_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            routes::KEYWORD_ITEM,
            delete(delete_handler).fallback(method_not_allowed_handler),
        )
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
