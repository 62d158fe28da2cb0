use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{create_handler, delete_handler, get_handler, list_handler};
use crate::state::AppState;

// Route path constants - single source of truth for all API paths
pub const ITEMS: &str = "/api/items";
pub const ITEM: &str = "/api/items/{key}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Build the full application router
///
/// Unmatched paths fall through to the static file directory.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .route(ITEMS, get(list_handler).post(create_handler))
        .route(ITEM, get(get_handler).delete(delete_handler))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
