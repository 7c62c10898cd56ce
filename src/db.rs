//! SQLite Storage Handle
//!
//! One connection shared behind a mutex. Every store in the service borrows it,
//! so writes are serialized and the schema is created exactly once per open.
//!
//! ```sql
//! CREATE TABLE users (
//!     id TEXT PRIMARY KEY,
//!     username TEXT UNIQUE NOT NULL,
//!     password_hash TEXT NOT NULL,
//!     email TEXT,
//!     git_addr TEXT,
//!     enabled INTEGER NOT NULL DEFAULT 1,
//!     created_at TEXT NOT NULL
//! );
//!
//! CREATE TABLE introductions (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     owner TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
//!     introduction_title TEXT NOT NULL,
//!     title1 .. title5 TEXT,
//!     content1 .. content5 TEXT,
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```

use anyhow::{Context, Result};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.initialize_schema()?;
        debug!("Database ready at {}", path.display());
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Lock the shared connection. Keep the guard short-lived.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        "#,
        )
        .context("Failed to configure database")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                email TEXT,
                git_addr TEXT,
                enabled INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS introductions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
                introduction_title TEXT NOT NULL,
                title1 TEXT,
                content1 TEXT,
                title2 TEXT,
                content2 TEXT,
                title3 TEXT,
                content3 TEXT,
                title4 TEXT,
                content4 TEXT,
                title5 TEXT,
                content5 TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_introductions_owner
                ON introductions(owner, id);
        "#,
        )
        .context("Failed to create schema")?;

        Ok(())
    }
}
