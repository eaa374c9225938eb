pub mod migrations;
pub mod queries;
pub mod store;

pub use store::{BookingStore, SqliteBookingStore};

use anyhow::Context;
use rusqlite::Connection;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("slot already taken")]
    SlotTaken,

    #[error("booking not found: {0}")]
    NotFound(i64),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    // journal_mode answers with a row, so it can't go through execute
    conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}
