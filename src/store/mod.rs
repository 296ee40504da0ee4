//! SQLite status store -- one row per watched receipt number.

pub mod schema;

use chrono::{DateTime, Utc};
use r2d2::Pool as R2D2Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::error::{Result, WatchError};

/// Connection Pool type
pub type Pool = R2D2Pool<SqliteConnectionManager>;

/// Open (or create) the SQLite database and return a connection pool.
pub fn open_pool(path: &str) -> Result<Pool> {
    let manager = SqliteConnectionManager::file(path).with_init(|c| {
        c.execute_batch(
            "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
        )
    });

    let pool = R2D2Pool::new(manager)?;

    // Run migrations on a single connection
    let conn = pool.get()?;
    schema::migrate(&conn)?;

    Ok(pool)
}

/// Last-known-status persistence keyed by receipt number.
pub struct StatusStore {
    pool: Pool,
}

impl StatusStore {
    /// Open the store at `path`, creating the database and running
    /// migrations as needed.
    pub fn open(path: &str) -> Result<Self> {
        let pool = open_pool(path)?;
        Ok(Self { pool })
    }

    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Last known status for `receipt_number`. A missing row is
    /// `RecordNotFound`, distinct from a stored empty string.
    pub fn get_last_known_status(&self, receipt_number: &str) -> Result<String> {
        let conn = self.pool.get()?;
        conn.query_row(
            "SELECT last_known_status FROM case_statuses WHERE receipt_number = ?1",
            rusqlite::params![receipt_number],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                WatchError::RecordNotFound(receipt_number.to_string())
            }
            other => WatchError::Store(other),
        })
    }

    /// Idempotent upsert: overwrite the stored status for `receipt_number`,
    /// creating the row if absent. Refreshes `updated_at`.
    pub fn set_last_known_status(&self, receipt_number: &str, status: &str) -> Result<()> {
        let conn = self.pool.get()?;
        let now: DateTime<Utc> = Utc::now();

        conn.execute(
            "INSERT INTO case_statuses (receipt_number, last_known_status, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(receipt_number) DO UPDATE SET
                 last_known_status = excluded.last_known_status,
                 updated_at = excluded.updated_at",
            rusqlite::params![receipt_number, status, now.to_rfc3339()],
        )?;

        Ok(())
    }

    /// Stored status plus its `updated_at` timestamp, for operator display.
    pub fn record(&self, receipt_number: &str) -> Result<(String, String)> {
        let conn = self.pool.get()?;
        conn.query_row(
            "SELECT last_known_status, updated_at FROM case_statuses WHERE receipt_number = ?1",
            rusqlite::params![receipt_number],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                WatchError::RecordNotFound(receipt_number.to_string())
            }
            other => WatchError::Store(other),
        })
    }
}
