use serde::{Deserialize, Serialize};

use crate::store::Entry;

/// Request body for creating an item
///
/// Both fields are optional at the wire level so that missing fields surface
/// as a validation error instead of a deserialization failure.
#[derive(Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateItemRequest {
    pub key: Option<String>,
    pub value: Option<String>,
}

/// A single key-value item
///
/// In listings `value` is `null` for a key whose value vanished between the
/// key listing and the value fetch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct ItemResponse {
    pub key: String,
    pub value: Option<String>,
}

impl From<Entry> for ItemResponse {
    fn from(entry: Entry) -> Self {
        ItemResponse {
            key: entry.key,
            value: entry.value,
        }
    }
}

/// Response type for the list endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListResponse {
    pub items: Vec<ItemResponse>,
}

/// Acknowledgement for create and delete
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
