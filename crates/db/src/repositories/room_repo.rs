//! Repository for the `rooms` table and availability queries.

use bookings_core::types::{Date, DbId};
use sqlx::PgExecutor;

use crate::models::room::RoomRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_name, created_at, updated_at";

/// Provides read access to rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Find a room by id.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<RoomRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, RoomRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all rooms ordered by id.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<RoomRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM rooms ORDER BY id");
        sqlx::query_as::<_, RoomRow>(&query)
            .fetch_all(executor)
            .await
    }

    /// Rooms with no restriction overlapping `[start, end)`, ordered by id.
    pub async fn list_available<'e, E>(
        executor: E,
        start: Date,
        end: Date,
    ) -> Result<Vec<RoomRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms r
             WHERE NOT EXISTS (
                 SELECT 1 FROM room_restrictions rr
                 WHERE rr.room_id = r.id
                   AND rr.start_date < $2
                   AND rr.end_date > $1
             )
             ORDER BY r.id"
        );
        sqlx::query_as::<_, RoomRow>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(executor)
            .await
    }

    /// `true` if no restriction for the room overlaps `[start, end)`.
    pub async fn is_available<'e, E>(
        executor: E,
        room_id: DbId,
        start: Date,
        end: Date,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let overlapping: i64 = sqlx::query_scalar(
            "SELECT COUNT(id) FROM room_restrictions
             WHERE room_id = $1
               AND start_date < $3
               AND end_date > $2",
        )
        .bind(room_id)
        .bind(start)
        .bind(end)
        .fetch_one(executor)
        .await?;
        Ok(overlapping == 0)
    }
}
