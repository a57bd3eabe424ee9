use crate::Database;
use crate::models::{LinkedAccountRow, PendingLinkRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Pending links --

    /// Registers a one-time link code for a game account. Resubmitting the
    /// same code overwrites the previous registration.
    pub fn upsert_pending_link(
        &self,
        code: &str,
        roblox_user_id: &str,
        roblox_username: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO pending_links (code, roblox_user_id, roblox_username)
                 VALUES (?1, ?2, ?3)",
                (code, roblox_user_id, roblox_username),
            )?;
            Ok(())
        })
    }

    /// Pure lookup, no mutation. Codes older than `ttl_secs` resolve as absent.
    pub fn get_pending_link(&self, code: &str, ttl_secs: i64) -> Result<Option<PendingLinkRow>> {
        self.with_conn(|conn| query_pending_link(conn, code, ttl_secs))
    }

    /// Redeems a pending code for `website_user_id` in a single transaction:
    /// the link upsert and the code deletion commit together or not at all, so
    /// a consumed code can never be redeemed twice.
    ///
    /// Returns `None` when the code is unknown or expired; nothing is written
    /// in that case.
    pub fn consume_pending_link(
        &self,
        code: &str,
        website_user_id: &str,
        ttl_secs: i64,
    ) -> Result<Option<LinkedAccountRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let Some(pending) = query_pending_link(&tx, code, ttl_secs)? else {
                return Ok(None);
            };

            // Keyed by the UNIQUE roblox_user_id: re-linking the same game
            // account replaces the prior association.
            tx.execute(
                "INSERT OR REPLACE INTO linked_accounts
                     (website_user_id, roblox_user_id, roblox_username)
                 VALUES (?1, ?2, ?3)",
                (website_user_id, &pending.roblox_user_id, &pending.roblox_username),
            )?;
            tx.execute("DELETE FROM pending_links WHERE code = ?1", [code])?;

            let row = query_linked_account(&tx, &pending.roblox_user_id)?;
            tx.commit()?;

            Ok(row)
        })
    }

    pub fn delete_expired_pending_links(&self, ttl_secs: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let count = conn.execute(
                "DELETE FROM pending_links
                 WHERE created_at <= datetime('now', '-' || ?1 || ' seconds')",
                [ttl_secs],
            )?;
            Ok(count)
        })
    }

    // -- Linked accounts --

    pub fn get_linked_account(&self, roblox_user_id: &str) -> Result<Option<LinkedAccountRow>> {
        self.with_conn(|conn| query_linked_account(conn, roblox_user_id))
    }

    // -- Playtime --

    /// Appends one session's playtime. Entries are never updated or deleted.
    pub fn insert_playtime(&self, roblox_user_id: &str, seconds: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO playtime (roblox_user_id, seconds) VALUES (?1, ?2)",
                (roblox_user_id, seconds),
            )?;
            Ok(())
        })
    }

    pub fn total_playtime(&self, roblox_user_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let total = conn.query_row(
                "SELECT COALESCE(SUM(seconds), 0) FROM playtime WHERE roblox_user_id = ?1",
                [roblox_user_id],
                |row| row.get(0),
            )?;
            Ok(total)
        })
    }
}

fn query_pending_link(
    conn: &Connection,
    code: &str,
    ttl_secs: i64,
) -> Result<Option<PendingLinkRow>> {
    let mut stmt = conn.prepare(
        "SELECT code, roblox_user_id, roblox_username, created_at
         FROM pending_links
         WHERE code = ?1
           AND created_at > datetime('now', '-' || ?2 || ' seconds')",
    )?;

    let row = stmt
        .query_row((code, ttl_secs), |row| {
            Ok(PendingLinkRow {
                code: row.get(0)?,
                roblox_user_id: row.get(1)?,
                roblox_username: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_linked_account(conn: &Connection, roblox_user_id: &str) -> Result<Option<LinkedAccountRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, website_user_id, roblox_user_id, roblox_username, linked_at
         FROM linked_accounts
         WHERE roblox_user_id = ?1",
    )?;

    let row = stmt
        .query_row([roblox_user_id], |row| {
            Ok(LinkedAccountRow {
                id: row.get(0)?,
                website_user_id: row.get(1)?,
                roblox_user_id: row.get(2)?,
                roblox_username: row.get(3)?,
                linked_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    const TTL: i64 = 900;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    /// Inserts a pending link whose created_at lies in the past.
    fn backdate_pending(db: &Database, code: &str, age_secs: i64) {
        db.with_conn_mut(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO pending_links
                     (code, roblox_user_id, roblox_username, created_at)
                 VALUES (?1, '99', 'Bob', datetime('now', '-' || ?2 || ' seconds'))",
                (code, age_secs),
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn submit_then_resolve_returns_same_triple() {
        let db = db();
        db.upsert_pending_link("ABC123", "99", "Bob").unwrap();

        let row = db.get_pending_link("ABC123", TTL).unwrap().unwrap();
        assert_eq!(row.code, "ABC123");
        assert_eq!(row.roblox_user_id, "99");
        assert_eq!(row.roblox_username, "Bob");
    }

    #[test]
    fn resubmitting_a_code_overwrites() {
        let db = db();
        db.upsert_pending_link("ABC123", "99", "Bob").unwrap();
        db.upsert_pending_link("ABC123", "100", "Alice").unwrap();

        let row = db.get_pending_link("ABC123", TTL).unwrap().unwrap();
        assert_eq!(row.roblox_user_id, "100");
        assert_eq!(row.roblox_username, "Alice");
    }

    #[test]
    fn consume_unknown_code_writes_nothing() {
        let db = db();
        let result = db.consume_pending_link("NOPE", "website-42", TTL).unwrap();
        assert!(result.is_none());
        assert!(db.get_linked_account("99").unwrap().is_none());
    }

    #[test]
    fn consume_links_and_deletes_the_code() {
        let db = db();
        db.upsert_pending_link("ABC123", "99", "Bob").unwrap();

        let linked = db
            .consume_pending_link("ABC123", "website-42", TTL)
            .unwrap()
            .unwrap();
        assert_eq!(linked.website_user_id, "website-42");
        assert_eq!(linked.roblox_user_id, "99");
        assert_eq!(linked.roblox_username, "Bob");

        // Consumed: the code no longer resolves and cannot be redeemed again
        assert!(db.get_pending_link("ABC123", TTL).unwrap().is_none());
        assert!(
            db.consume_pending_link("ABC123", "website-43", TTL)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn relinking_overwrites_the_association() {
        let db = db();
        db.upsert_pending_link("FIRST", "99", "Bob").unwrap();
        db.consume_pending_link("FIRST", "website-42", TTL)
            .unwrap()
            .unwrap();

        db.upsert_pending_link("SECOND", "99", "Bob").unwrap();
        db.consume_pending_link("SECOND", "website-77", TTL)
            .unwrap()
            .unwrap();

        let linked = db.get_linked_account("99").unwrap().unwrap();
        assert_eq!(linked.website_user_id, "website-77");

        // Still exactly one row for this game account
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM linked_accounts WHERE roblox_user_id = '99'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn expired_codes_do_not_resolve_or_consume() {
        let db = db();
        backdate_pending(&db, "OLD", TTL + 60);

        assert!(db.get_pending_link("OLD", TTL).unwrap().is_none());
        assert!(
            db.consume_pending_link("OLD", "website-42", TTL)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn sweep_deletes_only_expired_codes() {
        let db = db();
        backdate_pending(&db, "OLD", TTL + 60);
        db.upsert_pending_link("FRESH", "100", "Alice").unwrap();

        let pruned = db.delete_expired_pending_links(TTL).unwrap();
        assert_eq!(pruned, 1);
        assert!(db.get_pending_link("FRESH", TTL).unwrap().is_some());
    }

    #[test]
    fn playtime_sums_all_entries() {
        let db = db();
        assert_eq!(db.total_playtime("99").unwrap(), 0);

        db.insert_playtime("99", 120).unwrap();
        db.insert_playtime("99", 45).unwrap();
        db.insert_playtime("99", 0).unwrap();
        db.insert_playtime("other", 999).unwrap();

        assert_eq!(db.total_playtime("99").unwrap(), 165);
    }
}
