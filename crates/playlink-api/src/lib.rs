pub mod error;
pub mod links;
pub mod pages;
pub mod playtime;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use playlink_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Pending codes older than this are invisible and eventually swept.
    pub code_ttl_secs: i64,
}

/// Assembles the full route table. The server binary wraps this in its
/// CORS/trace layers and static-file service.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Game-client API
        .route("/api/link", post(links::submit_code))
        .route("/api/playtime", post(playtime::record_playtime))
        // Website
        .route("/", get(pages::home))
        .route("/link", get(pages::link_form).post(links::complete_link))
        .route("/profile", get(pages::profile_search))
        .route("/profile/{roblox_id}", get(pages::profile))
        .with_state(state)
}
