//! Booking domain entities: rooms, restrictions and reservations.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stay::StayRange;
use crate::types::{DbId, Timestamp};

/// A bookable room. Reference data, seeded by migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: DbId,
    pub room_name: String,
}

/// Why a room is blocked for a date span.
///
/// Ids match the `restrictions` seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// Blocked by a confirmed booking.
    Reservation,
    /// Blocked by the owner (maintenance, private use).
    OwnerBlock,
}

impl RestrictionKind {
    pub fn id(self) -> DbId {
        match self {
            RestrictionKind::Reservation => 1,
            RestrictionKind::OwnerBlock => 2,
        }
    }

    pub fn from_id(id: DbId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(RestrictionKind::Reservation),
            2 => Ok(RestrictionKind::OwnerBlock),
            other => Err(CoreError::Internal(format!(
                "Unknown restriction kind id {other}"
            ))),
        }
    }
}

/// A date span during which a room is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRestriction {
    pub id: DbId,
    pub room_id: DbId,
    pub reservation_id: Option<DbId>,
    pub kind: RestrictionKind,
    pub stay: StayRange,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting a room restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoomRestriction {
    pub room_id: DbId,
    pub reservation_id: Option<DbId>,
    pub kind: RestrictionKind,
    pub stay: StayRange,
}

impl NewRoomRestriction {
    /// The restriction paired with a confirmed reservation.
    pub fn for_reservation(reservation_id: DbId, room_id: DbId, stay: StayRange) -> Self {
        Self {
            room_id,
            reservation_id: Some(reservation_id),
            kind: RestrictionKind::Reservation,
            stay,
        }
    }
}

/// A persisted reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub room_id: DbId,
    pub stay: StayRange,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A validated reservation ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub room_id: DbId,
    pub stay: StayRange,
}
