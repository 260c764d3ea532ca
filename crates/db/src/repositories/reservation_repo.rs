//! Repository for the `reservations` table.

use bookings_core::booking::NewReservation;
use bookings_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::reservation::ReservationRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, phone, start_date, end_date, \
                       room_id, created_at, updated_at";

/// Provides insert and lookup operations for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a reservation, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        input: &NewReservation,
    ) -> Result<ReservationRow, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO reservations
                (first_name, last_name, email, phone, start_date, end_date, room_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.stay.start())
            .bind(input.stay.end())
            .bind(input.room_id)
            .fetch_one(executor)
            .await
    }

    /// Find a reservation by id.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<ReservationRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List reservations for a room, ordered by start date.
    pub async fn list_by_room<'e, E>(
        executor: E,
        room_id: DbId,
    ) -> Result<Vec<ReservationRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations WHERE room_id = $1 ORDER BY start_date, id"
        );
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(room_id)
            .fetch_all(executor)
            .await
    }
}
