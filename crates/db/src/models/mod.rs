//! Database row models.
//!
//! Each submodule contains a `FromRow` struct matching the table row and a
//! conversion into the corresponding `bookings_core` domain type.

pub mod booking_session;
pub mod reservation;
pub mod room;
pub mod room_restriction;
