/// Database row types — these map directly to SQLite rows.

pub struct PendingLinkRow {
    pub code: String,
    pub roblox_user_id: String,
    pub roblox_username: String,
    pub created_at: String,
}

pub struct LinkedAccountRow {
    pub id: i64,
    pub website_user_id: String,
    pub roblox_user_id: String,
    pub roblox_username: String,
    pub linked_at: String,
}
