//! Shared response envelope types for API handlers.
//!
//! Successful responses use a `{ "data": ... }` envelope. The single-room
//! availability endpoint is the exception: it answers with the flat
//! [`AvailabilityResponse`] shape its clients expect.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Body of `POST /search-availability-json`.
///
/// `ok` is `true` when the room is free for the whole range.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub ok: bool,
    pub message: String,
    pub room_id: String,
    pub start_date: String,
    pub end_date: String,
}
