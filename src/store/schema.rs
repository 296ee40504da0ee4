//! Database schema and migrations.

use rusqlite::Connection;

use crate::error::Result;

/// Run all pending migrations.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS case_statuses (
            receipt_number TEXT PRIMARY KEY,
            last_known_status TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;
    Ok(())
}
