//! Database repository for accounts, sessions and sheets.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Session, SheetDocument, Topic, User};

/// Fixed-width UTC timestamp, so stored values compare correctly as text.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Find a user by (already normalized) email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a new user. Fails with `Conflict` when the email is taken.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = format_timestamp(Utc::now());

        // The unique index on email turns a taken address into Conflict.
        sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(email)
            .bind(password_hash)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    // ==================== SESSION OPERATIONS ====================

    /// Store a new session and return its id.
    pub async fn create_session(
        &self,
        user_id: &str,
        secret_hash: &[u8],
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = format_timestamp(Utc::now());
        let expires_at = format_timestamp(expires_at);

        sqlx::query(
            "INSERT INTO sessions (id, user_id, secret_hash, created_at, expires_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(secret_hash)
        .bind(&now)
        .bind(&expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Session {
            id,
            user_id: user_id.to_string(),
            secret_hash: secret_hash.to_vec(),
            expires_at,
        })
    }

    /// Get a session by ID.
    pub async fn get_session(&self, id: &str) -> Result<Option<Session>, AppError> {
        let row =
            sqlx::query("SELECT id, user_id, secret_hash, expires_at FROM sessions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.as_ref().map(session_from_row))
    }

    /// Remove sessions that expired before `now`. Returns how many were removed.
    pub async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(format_timestamp(now))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove `user_id`'s sessions that expired before `now`.
    pub async fn delete_expired_sessions_for_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND expires_at <= ?")
            .bind(user_id)
            .bind(format_timestamp(now))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ==================== SHEET OPERATIONS ====================

    /// Get the owner's sheet, if one has been written.
    pub async fn get_sheet(&self, owner_id: &str) -> Result<Option<SheetDocument>, AppError> {
        let row =
            sqlx::query("SELECT topics, revision, updated_at FROM sheets WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(sheet_from_row).transpose()
    }

    /// Create or replace the owner's sheet. Last write wins.
    pub async fn upsert_sheet(
        &self,
        owner_id: &str,
        topics: &[Topic],
    ) -> Result<SheetDocument, AppError> {
        let topics_json = serde_json::to_string(topics)
            .map_err(|e| AppError::Internal(format!("Failed to encode sheet: {}", e)))?;
        let now = format_timestamp(Utc::now());

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO sheets (owner_id, topics, revision, updated_at)
               VALUES (?, ?, 1, ?)
               ON CONFLICT(owner_id) DO UPDATE SET
                   topics = excluded.topics,
                   revision = sheets.revision + 1,
                   updated_at = excluded.updated_at"#,
        )
        .bind(owner_id)
        .bind(&topics_json)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query("SELECT topics, revision, updated_at FROM sheets WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        sheet_from_row(&row)
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Session {
    Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        secret_hash: row.get("secret_hash"),
        expires_at: row.get("expires_at"),
    }
}

fn sheet_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SheetDocument, AppError> {
    let topics_json: String = row.get("topics");
    let topics: Vec<Topic> = serde_json::from_str(&topics_json).map_err(|e| {
        tracing::error!("Stored sheet is not valid JSON: {:?}", e);
        AppError::Internal(format!("Corrupt sheet document: {}", e))
    })?;

    Ok(SheetDocument {
        topics,
        updated_at: Some(row.get("updated_at")),
        revision: Some(row.get("revision")),
    })
}
