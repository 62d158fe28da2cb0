use crate::error::{ApiError, ErrorResponse};
use crate::models::ItemResponse;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// GET /api/items/:key handler - Retrieve a single item
#[utoipa::path(
    get,
    path = routes::ITEM,
    params(
        ("key" = String, Path, description = "Item key")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Remote store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let value = state.store.get_value(&key).await.map_err(|e| {
        tracing::error!("Get item error for {}: {}", key, e);
        ApiError::from(e)
    })?;

    match value {
        Some(value) => {
            tracing::info!("Successfully retrieved item with key: {}", key);
            Ok((StatusCode::OK, Json(ItemResponse { key, value: Some(value) })))
        }
        None => {
            tracing::info!("Item not found with key: {}", key);
            Err(ApiError::NotFound)
        }
    }
}
