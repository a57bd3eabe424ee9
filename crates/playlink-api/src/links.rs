use axum::{Form, Json, extract::State, response::IntoResponse};
use tracing::{error, info};

use playlink_types::api::{LinkCodeRequest, LinkForm, SuccessResponse};

use crate::AppState;
use crate::error::{ApiError, PageError};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Step 1 of the handshake: the game client registers a one-time code for a
/// player. Re-posting the same code overwrites the pending entry.
pub async fn submit_code(
    State(state): State<AppState>,
    Json(req): Json<LinkCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = non_empty(req.user_id).ok_or(ApiError::MissingFields)?;
    let code = non_empty(req.code).ok_or(ApiError::MissingFields)?;
    let username = req.username.unwrap_or_default();

    // Run blocking DB work off the async runtime
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.upsert_pending_link(&code, &user_id, &username))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Store(anyhow::anyhow!("task join error"))
        })??;

    Ok(Json(SuccessResponse::ok()))
}

/// Step 2: the website user redeems the code. The link upsert and the code
/// deletion happen in one transaction, so a redeemed code is gone for good.
pub async fn complete_link(
    State(state): State<AppState>,
    Form(form): Form<LinkForm>,
) -> Result<impl IntoResponse, PageError> {
    let code = non_empty(form.code).ok_or(PageError::MissingFields)?;
    let website_user_id = non_empty(form.website_user_id).ok_or(PageError::MissingFields)?;

    let db = state.clone();
    let ttl = state.code_ttl_secs;
    let linked = tokio::task::spawn_blocking(move || {
        db.db.consume_pending_link(&code, &website_user_id, ttl)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        PageError::Store(anyhow::anyhow!("task join error"))
    })??
    .ok_or(PageError::InvalidCode)?;

    info!(
        "Linked roblox user {} ({}) to website account {}",
        linked.roblox_user_id, linked.roblox_username, linked.website_user_id
    );

    Ok(format!(
        "✅ Linked {} to website account {}",
        linked.roblox_username, linked.website_user_id
    ))
}
