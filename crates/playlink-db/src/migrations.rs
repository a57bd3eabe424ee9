use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pending_links (
            code            TEXT PRIMARY KEY,
            roblox_user_id  TEXT NOT NULL,
            roblox_username TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS linked_accounts (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            website_user_id TEXT NOT NULL,
            roblox_user_id  TEXT NOT NULL UNIQUE,
            roblox_username TEXT NOT NULL,
            linked_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS playtime (
            roblox_user_id  TEXT NOT NULL,
            seconds         INTEGER NOT NULL,
            recorded_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_playtime_user
            ON playtime(roblox_user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
