//! Database Module
//!
//! SQLite connection pool, migrations, and the single-writer discipline
//! that mutating flows share.

pub mod repository;

use shared::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

/// Database service — owns the SQLite pool and the write lock
///
/// Reads go straight to the pool. Every mutating flow (item upsert, stock
/// adjustment, order placement, fulfillment) acquires the write lock for
/// the duration of its transaction, so read-then-write sequences inside a
/// transaction never interleave with another writer in this process.
/// SQLite's own locking (WAL + busy_timeout) backstops anything outside it.
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl DbService {
    /// Open the database, applying WAL mode and migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // WAL, foreign keys, normal sync; busy_timeout waits 5s on write
        // conflicts instead of failing immediately
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .busy_timeout(Duration::from_millis(5000));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Acquire the process-wide write lock
    ///
    /// Hold the returned guard for the whole transaction, commit included.
    pub async fn write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
