//! Repository for the `room_restrictions` table.

use bookings_core::booking::NewRoomRestriction;
use bookings_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::room_restriction::RoomRestrictionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, start_date, end_date, room_id, reservation_id, restriction_id, \
                       created_at, updated_at";

/// Provides insert and lookup operations for room restrictions.
pub struct RoomRestrictionRepo;

impl RoomRestrictionRepo {
    /// Insert a restriction, returning the created row.
    ///
    /// Overlapping an existing restriction for the same room violates the
    /// `ex_room_restrictions_overlap` exclusion constraint.
    pub async fn create<'e, E>(
        executor: E,
        input: &NewRoomRestriction,
    ) -> Result<RoomRestrictionRow, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO room_restrictions
                (start_date, end_date, room_id, reservation_id, restriction_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoomRestrictionRow>(&query)
            .bind(input.stay.start())
            .bind(input.stay.end())
            .bind(input.room_id)
            .bind(input.reservation_id)
            .bind(input.kind.id())
            .fetch_one(executor)
            .await
    }

    /// List restrictions for a room, ordered by start date.
    pub async fn list_by_room<'e, E>(
        executor: E,
        room_id: DbId,
    ) -> Result<Vec<RoomRestrictionRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM room_restrictions WHERE room_id = $1 ORDER BY start_date, id"
        );
        sqlx::query_as::<_, RoomRestrictionRow>(&query)
            .bind(room_id)
            .fetch_all(executor)
            .await
    }
}
