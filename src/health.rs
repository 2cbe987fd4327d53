// Database connectivity check

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionResponse {
    #[schema(example = "Connection to database successful!")]
    pub message: String,
    /// Names of the collections holding documents
    pub result: Vec<String>,
}

/// Handler for GET /check_connection
/// Lists collection names to prove the store is reachable
#[utoipa::path(
    get,
    path = "/check_connection",
    responses(
        (status = 200, description = "Store reachable", body = ConnectionResponse),
        (status = 500, description = "Store unreachable", body = String)
    ),
    tag = "health"
)]
pub async fn check_connection(
    State(state): State<AppState>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let collections = state.store.collection_names().await?;

    tracing::debug!("Store reachable, {} collections", collections.len());
    Ok(Json(ConnectionResponse {
        message: "Connection to database successful!".to_string(),
        result: collections,
    }))
}
