//! Availability queries over the storage port.

use std::sync::Arc;

use crate::booking::Room;
use crate::error::CoreError;
use crate::ports::BookingStore;
use crate::stay::StayRange;
use crate::types::DbId;

/// Stateless read-only availability service.
#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Every room with no restriction overlapping `stay`.
    ///
    /// An empty list means "no availability" and is not an error.
    pub async fn search_all_rooms(&self, stay: &StayRange) -> Result<Vec<Room>, CoreError> {
        let rooms = self.store.search_availability_for_all_rooms(stay).await?;
        tracing::debug!(
            start = %stay.start(),
            end = %stay.end(),
            available = rooms.len(),
            "Searched availability for all rooms"
        );
        Ok(rooms)
    }

    /// Whether `room_id` is free for the whole of `stay`.
    pub async fn is_room_available(
        &self,
        stay: &StayRange,
        room_id: DbId,
    ) -> Result<bool, CoreError> {
        self.store
            .search_availability_by_dates_by_room_id(stay, room_id)
            .await
    }
}
