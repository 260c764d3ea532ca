//! Repository for the `booking_sessions` table.

use bookings_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::booking_session::BookingSessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "session_id, draft, flash, expires_at, created_at, updated_at";

/// Provides storage for per-session drafts and flash messages.
///
/// Rows past `expires_at` are treated as absent by every read.
pub struct BookingSessionRepo;

impl BookingSessionRepo {
    /// Fetch a session row regardless of expiry.
    pub async fn find(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<BookingSessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booking_sessions WHERE session_id = $1");
        sqlx::query_as::<_, BookingSessionRow>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the live draft payload for a session.
    pub async fn find_draft(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        let draft: Option<Option<serde_json::Value>> = sqlx::query_scalar(
            "SELECT draft FROM booking_sessions
             WHERE session_id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(pool)
        .await?;
        Ok(draft.flatten())
    }

    /// Store the draft payload, creating the session row if needed and
    /// pushing its expiry out to `expires_at`.
    pub async fn upsert_draft(
        pool: &PgPool,
        session_id: &str,
        draft: &serde_json::Value,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO booking_sessions (session_id, draft, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (session_id) DO UPDATE SET
                draft = EXCLUDED.draft,
                flash = CASE WHEN booking_sessions.expires_at > NOW()
                             THEN booking_sessions.flash END,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()",
        )
        .bind(session_id)
        .bind(draft)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Clear the draft. Returns `true` if a draft was present.
    pub async fn clear_draft(pool: &PgPool, session_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE booking_sessions SET draft = NULL, updated_at = NOW()
             WHERE session_id = $1 AND draft IS NOT NULL",
        )
        .bind(session_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically read and clear the live draft payload.
    pub async fn take_draft(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE booking_sessions s SET draft = NULL, updated_at = NOW()
             FROM (SELECT session_id, draft FROM booking_sessions
                   WHERE session_id = $1 AND expires_at > NOW() AND draft IS NOT NULL
                   FOR UPDATE) prev
             WHERE s.session_id = prev.session_id
             RETURNING prev.draft",
        )
        .bind(session_id)
        .fetch_optional(pool)
        .await
    }

    /// Store a flash message, creating the session row if needed.
    pub async fn upsert_flash(
        pool: &PgPool,
        session_id: &str,
        flash: &serde_json::Value,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO booking_sessions (session_id, flash, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (session_id) DO UPDATE SET
                flash = EXCLUDED.flash,
                draft = CASE WHEN booking_sessions.expires_at > NOW()
                             THEN booking_sessions.draft END,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()",
        )
        .bind(session_id)
        .bind(flash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Atomically read and clear the live flash payload.
    pub async fn take_flash(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE booking_sessions s SET flash = NULL, updated_at = NOW()
             FROM (SELECT session_id, flash FROM booking_sessions
                   WHERE session_id = $1 AND expires_at > NOW() AND flash IS NOT NULL
                   FOR UPDATE) prev
             WHERE s.session_id = prev.session_id
             RETURNING prev.flash",
        )
        .bind(session_id)
        .fetch_optional(pool)
        .await
    }

    /// Delete sessions past their expiry. Returns the count of deleted rows.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM booking_sessions WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
