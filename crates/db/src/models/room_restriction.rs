//! Room restriction row model.

use bookings_core::booking::{RestrictionKind, RoomRestriction};
use bookings_core::error::CoreError;
use bookings_core::stay::StayRange;
use bookings_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `room_restrictions` table.
///
/// `restriction_id` references the `restrictions` lookup table.
#[derive(Debug, Clone, FromRow)]
pub struct RoomRestrictionRow {
    pub id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    pub room_id: DbId,
    pub reservation_id: Option<DbId>,
    pub restriction_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<RoomRestrictionRow> for RoomRestriction {
    type Error = CoreError;

    fn try_from(row: RoomRestrictionRow) -> Result<Self, Self::Error> {
        Ok(RoomRestriction {
            id: row.id,
            room_id: row.room_id,
            reservation_id: row.reservation_id,
            kind: RestrictionKind::from_id(row.restriction_id)?,
            stay: StayRange::new(row.start_date, row.end_date)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
