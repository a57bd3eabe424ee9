use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::error;

use playlink_types::duration::format_playtime;

use crate::AppState;
use crate::error::PageError;

pub async fn home() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Playlink</title>
    <link rel="stylesheet" href="/public/style.css">
</head>
<body>
    <h1>Playlink</h1>
    <p>Track your Roblox playtime and link your account.</p>
    <form action="/profile" method="get">
        <input name="robloxId" placeholder="Roblox user id">
        <button type="submit">Find profile</button>
    </form>
    <p><a href="/link">Link your account</a></p>
</body>
</html>"#,
    )
}

pub async fn link_form() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Link your account</title>
    <link rel="stylesheet" href="/public/style.css">
</head>
<body>
    <h1>Link your account</h1>
    <p>Enter the code shown in-game along with your website account id.</p>
    <form action="/link" method="post">
        <input name="code" placeholder="Code from the game">
        <input name="websiteUserId" placeholder="Website account id">
        <button type="submit">Link</button>
    </form>
</body>
</html>"#,
    )
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "robloxId")]
    pub roblox_id: Option<String>,
}

/// The homepage search box lands here; forward to the canonical profile URL.
pub async fn profile_search(Query(query): Query<ProfileQuery>) -> Redirect {
    match query.roblox_id.filter(|id| !id.is_empty()) {
        Some(id) => Redirect::to(&format!("/profile/{id}")),
        None => Redirect::to("/"),
    }
}

pub async fn profile(
    State(state): State<AppState>,
    Path(roblox_id): Path<String>,
) -> Result<impl IntoResponse, PageError> {
    let db = state.clone();
    let id = roblox_id;
    let (account, total) = tokio::task::spawn_blocking(move || {
        let account = db.db.get_linked_account(&id)?;
        let total = db.db.total_playtime(&id)?;
        Ok::<_, anyhow::Error>((account, total))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        PageError::Store(anyhow::anyhow!("task join error"))
    })??;

    // Never a zero-playtime page for unlinked ids
    let account = account.ok_or(PageError::NotFound)?;

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{username} - Playlink</title>
    <link rel="stylesheet" href="/public/style.css">
</head>
<body>
    <h1>{username}</h1>
    <p>Roblox id: {roblox_id}</p>
    <p>Total playtime: {playtime}</p>
    <p><a href="/">Back</a></p>
</body>
</html>"#,
        username = escape(&account.roblox_username),
        roblox_id = escape(&account.roblox_user_id),
        playtime = format_playtime(total),
    )))
}

/// Minimal HTML escaping for user-supplied values.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
