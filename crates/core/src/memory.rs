//! In-memory adapters for the storage and draft-store ports.
//!
//! Used by unit tests, HTTP tests and local runs without a database. The
//! booking store applies every write under one lock, so a commit is atomic
//! and overlapping restrictions for a room are rejected.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::booking::{NewReservation, NewRoomRestriction, Reservation, Room, RoomRestriction};
use crate::draft::{DraftReservation, FlashMessage, SessionId};
use crate::error::CoreError;
use crate::ports::{BookingStore, DraftStore};
use crate::stay::StayRange;
use crate::types::DbId;

#[derive(Debug, Default)]
struct Tables {
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    restrictions: Vec<RoomRestriction>,
    next_reservation_id: DbId,
    next_restriction_id: DbId,
}

impl Tables {
    fn room_is_free(&self, stay: &StayRange, room_id: DbId) -> bool {
        !self
            .restrictions
            .iter()
            .any(|r| r.room_id == room_id && r.stay.overlaps(stay))
    }

    fn push_reservation(&mut self, input: &NewReservation) -> Reservation {
        self.next_reservation_id += 1;
        let now = Utc::now();
        let reservation = Reservation {
            id: self.next_reservation_id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            room_id: input.room_id,
            stay: input.stay,
            created_at: now,
            updated_at: now,
        };
        self.reservations.push(reservation.clone());
        reservation
    }

    fn push_restriction(&mut self, input: &NewRoomRestriction) -> Result<(), CoreError> {
        if !self.room_is_free(&input.stay, input.room_id) {
            return Err(CoreError::Conflict(format!(
                "Room {} is no longer available for the selected dates",
                input.room_id
            )));
        }
        self.next_restriction_id += 1;
        let now = Utc::now();
        self.restrictions.push(RoomRestriction {
            id: self.next_restriction_id,
            room_id: input.room_id,
            reservation_id: input.reservation_id,
            kind: input.kind,
            stay: input.stay,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }
}

/// Booking store backed by vectors behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    tables: Mutex<Tables>,
    fail_next_restriction: AtomicBool,
}

impl InMemoryBookingStore {
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        let mut rooms = rooms;
        rooms.sort_by_key(|r| r.id);
        Self {
            tables: Mutex::new(Tables {
                rooms,
                ..Tables::default()
            }),
            fail_next_restriction: AtomicBool::new(false),
        }
    }

    /// The two rooms seeded by the database migrations.
    pub fn with_default_rooms() -> Self {
        Self::with_rooms(vec![
            Room {
                id: 1,
                room_name: "General's Quarters".into(),
            },
            Room {
                id: 2,
                room_name: "Major's Suite".into(),
            },
        ])
    }

    /// Make the next restriction insert fail with a storage error.
    pub fn fail_next_restriction_insert(&self) {
        self.fail_next_restriction.store(true, Ordering::SeqCst);
    }

    pub fn reservations(&self) -> Result<Vec<Reservation>, CoreError> {
        Ok(self.lock()?.reservations.clone())
    }

    pub fn restrictions(&self) -> Result<Vec<RoomRestriction>, CoreError> {
        Ok(self.lock()?.restrictions.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, CoreError> {
        self.tables
            .lock()
            .map_err(|_| CoreError::Internal("Booking store lock poisoned".into()))
    }

    fn injected_failure(&self) -> Result<(), CoreError> {
        if self.fail_next_restriction.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Storage(
                "Injected failure inserting room restriction".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert_reservation(&self, reservation: &NewReservation) -> Result<DbId, CoreError> {
        Ok(self.lock()?.push_reservation(reservation).id)
    }

    async fn insert_room_restriction(
        &self,
        restriction: &NewRoomRestriction,
    ) -> Result<(), CoreError> {
        self.injected_failure()?;
        self.lock()?.push_restriction(restriction)
    }

    async fn search_availability_for_all_rooms(
        &self,
        stay: &StayRange,
    ) -> Result<Vec<Room>, CoreError> {
        let tables = self.lock()?;
        Ok(tables
            .rooms
            .iter()
            .filter(|room| tables.room_is_free(stay, room.id))
            .cloned()
            .collect())
    }

    async fn search_availability_by_dates_by_room_id(
        &self,
        stay: &StayRange,
        room_id: DbId,
    ) -> Result<bool, CoreError> {
        Ok(self.lock()?.room_is_free(stay, room_id))
    }

    async fn get_room_by_id(&self, room_id: DbId) -> Result<Room, CoreError> {
        self.lock()?
            .rooms
            .iter()
            .find(|r| r.id == room_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "room",
                id: room_id,
            })
    }

    async fn commit_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, CoreError> {
        let mut tables = self.lock()?;
        let snapshot_next_id = tables.next_reservation_id;

        let saved = tables.push_reservation(reservation);
        let restriction =
            NewRoomRestriction::for_reservation(saved.id, reservation.room_id, reservation.stay);

        let outcome = self
            .injected_failure()
            .and_then(|_| tables.push_restriction(&restriction));
        if let Err(e) = outcome {
            // Roll back the reservation row.
            tables.reservations.retain(|r| r.id != saved.id);
            tables.next_reservation_id = snapshot_next_id;
            return Err(e);
        }
        Ok(saved)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, CoreError> {
        Ok(self.lock()?.rooms.clone())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        self.lock().map(|_| ())
    }
}

#[derive(Debug, Default)]
struct SessionSlot {
    draft: Option<serde_json::Value>,
    flash: Option<FlashMessage>,
}

/// Draft store keyed by session id.
///
/// Drafts are held in their encoded form so decoding failures surface the
/// same way they do for a persistent store.
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    sessions: Mutex<HashMap<SessionId, SessionSlot>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw payload for a session, bypassing encoding.
    pub fn put_raw(
        &self,
        session: &SessionId,
        payload: serde_json::Value,
    ) -> Result<(), CoreError> {
        self.lock()?.entry(session.clone()).or_default().draft = Some(payload);
        Ok(())
    }

    /// Number of sessions currently holding a draft.
    pub fn draft_count(&self) -> Result<usize, CoreError> {
        Ok(self.lock()?.values().filter(|s| s.draft.is_some()).count())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionSlot>>, CoreError> {
        self.sessions
            .lock()
            .map_err(|_| CoreError::Internal("Draft store lock poisoned".into()))
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn get(&self, session: &SessionId) -> Result<Option<DraftReservation>, CoreError> {
        let payload = self
            .lock()?
            .get(session)
            .and_then(|slot| slot.draft.clone());
        payload.map(DraftReservation::decode).transpose()
    }

    async fn put(&self, session: &SessionId, draft: &DraftReservation) -> Result<(), CoreError> {
        let encoded = draft.encode()?;
        self.lock()?.entry(session.clone()).or_default().draft = Some(encoded);
        Ok(())
    }

    async fn remove(&self, session: &SessionId) -> Result<(), CoreError> {
        if let Some(slot) = self.lock()?.get_mut(session) {
            slot.draft = None;
        }
        Ok(())
    }

    async fn take(&self, session: &SessionId) -> Result<Option<DraftReservation>, CoreError> {
        let payload = self
            .lock()?
            .get_mut(session)
            .and_then(|slot| slot.draft.take());
        payload.map(DraftReservation::decode).transpose()
    }

    async fn put_flash(&self, session: &SessionId, flash: &FlashMessage) -> Result<(), CoreError> {
        self.lock()?.entry(session.clone()).or_default().flash = Some(flash.clone());
        Ok(())
    }

    async fn take_flash(&self, session: &SessionId) -> Result<Option<FlashMessage>, CoreError> {
        Ok(self
            .lock()?
            .get_mut(session)
            .and_then(|slot| slot.flash.take()))
    }
}
