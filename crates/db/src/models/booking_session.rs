//! Booking session row model.

use bookings_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `booking_sessions` table.
///
/// `draft` and `flash` hold the JSON encodings of
/// [`bookings_core::draft::DraftReservation`] and
/// [`bookings_core::draft::FlashMessage`].
#[derive(Debug, Clone, FromRow)]
pub struct BookingSessionRow {
    pub session_id: String,
    pub draft: Option<serde_json::Value>,
    pub flash: Option<serde_json::Value>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
