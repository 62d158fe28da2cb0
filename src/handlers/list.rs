use crate::error::{ApiError, ErrorResponse};
use crate::models::{ItemResponse, ListResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /api/items handler - List every item in the namespace
///
/// Lists all keys, then fetches each value concurrently. If the listing or
/// any single value fetch fails, the whole request fails with 500 and no
/// partial list is returned.
#[utoipa::path(
    get,
    path = routes::ITEMS,
    responses(
        (status = 200, description = "All items with their values", body = ListResponse),
        (status = 500, description = "Remote store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ListResponse>), ApiError> {
    let entries = state.store.list_entries().await.map_err(|e| {
        tracing::error!("List items error: {}", e);
        ApiError::from(e)
    })?;

    let items: Vec<ItemResponse> = entries.into_iter().map(ItemResponse::from).collect();
    tracing::info!("Listed {} items", items.len());

    Ok((StatusCode::OK, Json(ListResponse { items })))
}
