//! User Storage
//! Mission: Securely store and manage user accounts with SQLite

use crate::auth::authenticator::CredentialStore;
use crate::auth::models::User;
use crate::db::Database;
use anyhow::{Context, Result};
use bcrypt::hash;
use chrono::Utc;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// New account as accepted by registration (already validated).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub git_addr: Option<String>,
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// User storage with SQLite backend
pub struct UserStore {
    db: Database,
    hash_cost: u32,
}

impl UserStore {
    pub fn with_hash_cost(db: Database, hash_cost: u32) -> Self {
        Self { db, hash_cost }
    }

    fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        let id: String = row.get(0)?;
        let id = Uuid::parse_str(&id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(User {
            id,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            email: row.get(3)?,
            git_addr: row.get(4)?,
            enabled: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    /// Get user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.db.conn();

        let user = conn
            .query_row(
                "SELECT id, username, password_hash, email, git_addr, enabled, created_at
                 FROM users WHERE username = ?1",
                params![username],
                Self::user_from_row,
            )
            .optional()
            .context("Failed to load user")?;

        Ok(user)
    }

    /// Create a new user; the password is bcrypt-hashed before it touches the database
    pub fn create_user(&self, new_user: &NewUser) -> Result<User, UserStoreError> {
        let password_hash =
            hash(&new_user.password, self.hash_cost).context("Failed to hash password")?;

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            password_hash,
            email: new_user.email.clone().filter(|e| !e.trim().is_empty()),
            git_addr: new_user.git_addr.clone().filter(|g| !g.trim().is_empty()),
            enabled: true,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = self.db.conn();
        let inserted = conn.execute(
            "INSERT INTO users (id, username, password_hash, email, git_addr, enabled, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.email,
                user.git_addr,
                user.enabled,
                user.created_at,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(UserStoreError::DuplicateUsername(user.username));
            }
            Err(e) => return Err(anyhow::Error::new(e).context("Failed to insert user").into()),
        }

        info!("✅ Created user: {}", user.username);

        Ok(user)
    }

    /// Enable or disable an account. Returns false when the user does not exist.
    pub fn set_enabled(&self, username: &str, enabled: bool) -> Result<bool> {
        let conn = self.db.conn();

        let rows_affected = conn
            .execute(
                "UPDATE users SET enabled = ?1 WHERE username = ?2",
                params![enabled, username],
            )
            .context("Failed to update user")?;

        if rows_affected > 0 {
            info!(
                "🔐 User {} {}",
                username,
                if enabled { "enabled" } else { "disabled" }
            );
        }

        Ok(rows_affected > 0)
    }
}

impl CredentialStore for UserStore {
    fn find_credential(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username(username)
    }

    fn hash_cost(&self) -> u32 {
        self.hash_cost
    }
}
