//! Room row model.

use bookings_core::booking::Room;
use bookings_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow)]
pub struct RoomRow {
    pub id: DbId,
    pub room_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            room_name: row.room_name,
        }
    }
}
