use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateItemRequest, MessageResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};

/// POST /api/items handler - Create or replace an item
///
/// Both `key` and `value` must be present and non-empty. A body that is not
/// JSON at all is treated the same as one with the fields missing.
#[utoipa::path(
    post,
    path = routes::ITEMS,
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item stored", body = MessageResponse),
        (status = 400, description = "Key or value missing", body = ErrorResponse),
        (status = 500, description = "Remote store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected create body: {}", rejection.body_text());
            CreateItemRequest::default()
        }
    };

    let (key, value) = match (request.key, request.value) {
        (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => (key, value),
        _ => {
            return Err(ApiError::Validation(
                "Key and value are required".to_string(),
            ))
        }
    };

    state.store.put_value(&key, &value).await.map_err(|e| {
        tracing::error!("Create item error for {}: {}", key, e);
        ApiError::from(e)
    })?;

    tracing::info!("Successfully stored item with key: {}", key);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Item created successfully".to_string(),
        }),
    ))
}
