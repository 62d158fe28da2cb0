use crate::error::{ApiError, ErrorResponse};
use crate::models::MessageResponse;
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::Path, extract::State, http::StatusCode};

/// DELETE /api/items/:key handler - Remove an item
///
/// Deleting a key that does not exist is reported however the remote store
/// reports it.
#[utoipa::path(
    delete,
    path = routes::ITEM,
    params(
        ("key" = String, Path, description = "Item key")
    ),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 500, description = "Remote store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.store.delete_value(&key).await.map_err(|e| {
        tracing::error!("Delete item error for {}: {}", key, e);
        ApiError::from(e)
    })?;

    tracing::info!("Successfully deleted item with key: {}", key);
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Item deleted successfully".to_string(),
        }),
    ))
}
