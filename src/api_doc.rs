use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{CreateItemRequest, ItemResponse, ListResponse, MessageResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "kv-proxy API",
        version = "1.0.0",
        description = "REST facade over a Cloudflare Workers KV namespace"
    ),
    paths(
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::get::get_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            CreateItemRequest,
            ItemResponse,
            ListResponse,
            MessageResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "items", description = "Key-value item operations")
    )
)]
pub struct ApiDoc;
