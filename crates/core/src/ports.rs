//! Driven ports consumed by the availability service and booking workflow.
//!
//! Implemented by:
//! - [`crate::memory::InMemoryBookingStore`] / [`crate::memory::InMemoryDraftStore`]
//! - `bookings_db::store::PgBookingStore` / `bookings_db::store::PgDraftStore`

use async_trait::async_trait;

use crate::booking::{NewReservation, NewRoomRestriction, Reservation, Room};
use crate::draft::{DraftReservation, FlashMessage, SessionId};
use crate::error::CoreError;
use crate::stay::StayRange;
use crate::types::DbId;

/// Persistence boundary for rooms, reservations and restrictions.
///
/// Every operation is individually bounded by a deadline in the production
/// adapter; a timed-out call fails with [`CoreError::Timeout`].
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a reservation row, returning its id.
    async fn insert_reservation(&self, reservation: &NewReservation) -> Result<DbId, CoreError>;

    /// Insert a restriction row. Overlapping an existing restriction for the
    /// same room fails with [`CoreError::Conflict`].
    async fn insert_room_restriction(
        &self,
        restriction: &NewRoomRestriction,
    ) -> Result<(), CoreError>;

    /// Rooms with no restriction overlapping `stay`, ordered by id.
    async fn search_availability_for_all_rooms(
        &self,
        stay: &StayRange,
    ) -> Result<Vec<Room>, CoreError>;

    /// `true` if no restriction for `room_id` overlaps `stay`.
    async fn search_availability_by_dates_by_room_id(
        &self,
        stay: &StayRange,
        room_id: DbId,
    ) -> Result<bool, CoreError>;

    /// Fetch one room; [`CoreError::NotFound`] if it does not exist.
    async fn get_room_by_id(&self, room_id: DbId) -> Result<Room, CoreError>;

    /// Insert the reservation and its `Reservation` restriction as one unit.
    ///
    /// Either both rows become visible or neither does. A concurrent booking
    /// that already holds an overlapping restriction makes this fail with
    /// [`CoreError::Conflict`].
    async fn commit_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, CoreError>;

    /// All rooms, ordered by id.
    async fn list_rooms(&self) -> Result<Vec<Room>, CoreError>;

    /// Cheap reachability check for health endpoints.
    async fn ping(&self) -> Result<(), CoreError>;
}

/// Per-session staging area holding at most one draft reservation.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn get(&self, session: &SessionId) -> Result<Option<DraftReservation>, CoreError>;

    /// Store the session's draft, replacing any previous one.
    async fn put(&self, session: &SessionId, draft: &DraftReservation) -> Result<(), CoreError>;

    async fn remove(&self, session: &SessionId) -> Result<(), CoreError>;

    /// Read and remove the draft in one step.
    async fn take(&self, session: &SessionId) -> Result<Option<DraftReservation>, CoreError> {
        let draft = self.get(session).await?;
        if draft.is_some() {
            self.remove(session).await?;
        }
        Ok(draft)
    }

    async fn put_flash(&self, session: &SessionId, flash: &FlashMessage) -> Result<(), CoreError>;

    /// Read and clear the pending flash message.
    async fn take_flash(&self, session: &SessionId) -> Result<Option<FlashMessage>, CoreError>;
}
