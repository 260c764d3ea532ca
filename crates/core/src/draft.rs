//! Session-scoped booking state: the draft reservation and flash messages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::booking::{NewReservation, Room};
use crate::error::CoreError;
use crate::stay::StayRange;
use crate::types::DbId;
use crate::validation::GuestDetails;

/// Opaque identifier of a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a session currently is in the booking journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    /// No draft in the session.
    Idle,
    /// A search produced rooms; none chosen yet.
    RoomOffered,
    /// A room is attached; guest details may be collected.
    RoomChosen,
    /// The reservation has been persisted and awaits its summary.
    Committed,
}

/// An in-progress reservation staged in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReservation {
    pub stay: StayRange,
    #[serde(default)]
    pub room_id: Option<DbId>,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub guest: GuestDetails,
    /// Set once the reservation has been committed.
    #[serde(default)]
    pub reservation_id: Option<DbId>,
}

impl DraftReservation {
    /// A fresh draft holding only the stay dates.
    pub fn for_stay(stay: StayRange) -> Self {
        Self {
            stay,
            room_id: None,
            room_name: None,
            guest: GuestDetails::default(),
            reservation_id: None,
        }
    }

    /// A fresh draft with the room already attached.
    pub fn for_room(stay: StayRange, room: &Room) -> Self {
        let mut draft = Self::for_stay(stay);
        draft.set_room(room);
        draft
    }

    pub fn set_room(&mut self, room: &Room) {
        self.room_id = Some(room.id);
        self.room_name = Some(room.room_name.clone());
    }

    pub fn stage(&self) -> BookingStage {
        match (self.room_id, self.reservation_id) {
            (_, Some(_)) => BookingStage::Committed,
            (Some(_), None) => BookingStage::RoomChosen,
            (None, None) => BookingStage::RoomOffered,
        }
    }

    /// Build the insert payload. Requires a chosen room.
    pub fn to_new_reservation(&self) -> Result<NewReservation, CoreError> {
        let room_id = self.room_id.ok_or_else(|| {
            CoreError::SessionState("No room has been chosen for this reservation".into())
        })?;
        Ok(NewReservation {
            first_name: self.guest.first_name.trim().to_string(),
            last_name: self.guest.last_name.trim().to_string(),
            email: self.guest.email.trim().to_string(),
            phone: self.guest.phone.trim().to_string(),
            room_id,
            stay: self.stay,
        })
    }

    /// Encode for session persistence.
    pub fn encode(&self) -> Result<serde_json::Value, CoreError> {
        serde_json::to_value(self)
            .map_err(|e| CoreError::Internal(format!("Failed to encode draft: {e}")))
    }

    /// Decode a stored draft. A malformed payload is a session-state error.
    pub fn decode(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|e| {
            CoreError::SessionState(format!("Stored reservation could not be read: {e}"))
        })
    }
}

/// Severity of a flash message. Serialized lowercase as the `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Error,
}

/// A one-shot notice shown on the next page the session visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

impl FlashMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}
