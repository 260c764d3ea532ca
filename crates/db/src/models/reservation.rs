//! Reservation row model.

use bookings_core::booking::Reservation;
use bookings_core::error::CoreError;
use bookings_core::stay::StayRange;
use bookings_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `reservations` table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationRow {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: Date,
    pub end_date: Date,
    pub room_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = CoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        Ok(Reservation {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            room_id: row.room_id,
            stay: StayRange::new(row.start_date, row.end_date)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
