use axum::{Json, extract::State, response::IntoResponse};
use tracing::error;

use playlink_types::api::{PlaytimeRequest, SuccessResponse};

use crate::AppState;
use crate::error::ApiError;

/// Appends one session's playtime for a game account. Zero-second sessions
/// are valid reports; negative values are rejected.
pub async fn record_playtime(
    State(state): State<AppState>,
    Json(req): Json<PlaytimeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = req
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let seconds = req
        .playtime
        .filter(|s| *s >= 0)
        .ok_or(ApiError::MissingFields)?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.insert_playtime(&user_id, seconds))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Store(anyhow::anyhow!("task join error"))
        })??;

    Ok(Json(SuccessResponse::ok()))
}
