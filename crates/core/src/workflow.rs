//! The booking workflow: search, pick a room, collect guest details,
//! validate, commit, summarize.
//!
//! The workflow keeps no state of its own. Everything a session has done so
//! far lives in its [`DraftReservation`] inside the [`DraftStore`], so
//! requests from different sessions never interfere.

use std::sync::Arc;

use crate::availability::AvailabilityService;
use crate::booking::{Reservation, Room};
use crate::draft::{BookingStage, DraftReservation, SessionId};
use crate::error::CoreError;
use crate::ports::{BookingStore, DraftStore};
use crate::stay::StayRange;
use crate::types::DbId;
use crate::validation::{FormErrors, GuestDetails};

pub const MSG_NO_DRAFT: &str = "Cannot get reservation from session";
pub const MSG_NO_ROOM: &str = "No room has been chosen for this reservation";
pub const MSG_NOT_COMMITTED: &str = "This reservation has not been completed yet";
pub const MSG_ALREADY_COMMITTED: &str = "This reservation has already been completed";

/// Result of an availability search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No room is free; no draft was written.
    NoAvailability,
    /// Rooms are free and a fresh draft holding the stay was stored.
    RoomsOffered {
        rooms: Vec<Room>,
        draft: DraftReservation,
    },
}

/// Result of submitting the guest details form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was persisted.
    Invalid {
        draft: DraftReservation,
        errors: FormErrors,
    },
    /// The reservation and its restriction were committed.
    Committed(Reservation),
}

#[derive(Clone)]
pub struct BookingWorkflow {
    store: Arc<dyn BookingStore>,
    drafts: Arc<dyn DraftStore>,
    availability: AvailabilityService,
}

impl BookingWorkflow {
    pub fn new(store: Arc<dyn BookingStore>, drafts: Arc<dyn DraftStore>) -> Self {
        let availability = AvailabilityService::new(Arc::clone(&store));
        Self {
            store,
            drafts,
            availability,
        }
    }

    pub fn drafts(&self) -> &Arc<dyn DraftStore> {
        &self.drafts
    }

    /// Search every room for `stay` and, if any is free, start a new draft.
    pub async fn search(
        &self,
        session: &SessionId,
        stay: StayRange,
    ) -> Result<SearchOutcome, CoreError> {
        let rooms = self.availability.search_all_rooms(&stay).await?;
        if rooms.is_empty() {
            tracing::info!(%session, start = %stay.start(), end = %stay.end(), "No availability");
            return Ok(SearchOutcome::NoAvailability);
        }

        let draft = DraftReservation::for_stay(stay);
        self.drafts.put(session, &draft).await?;
        log_stage(session, &draft);
        Ok(SearchOutcome::RoomsOffered { rooms, draft })
    }

    /// Attach one of the offered rooms to the session's draft.
    ///
    /// A committed draft keeps its room until the summary consumes it.
    pub async fn choose_room(
        &self,
        session: &SessionId,
        room_id: DbId,
    ) -> Result<DraftReservation, CoreError> {
        let mut draft = self.require_open_draft(session).await?;
        let room = self.store.get_room_by_id(room_id).await?;
        draft.set_room(&room);
        self.drafts.put(session, &draft).await?;
        log_stage(session, &draft);
        Ok(draft)
    }

    /// Start a booking from a direct room/date link, bypassing the search.
    ///
    /// The room must be free for the stay; otherwise [`CoreError::Conflict`]
    /// is returned and the session's draft is left untouched.
    pub async fn book_room(
        &self,
        session: &SessionId,
        room_id: DbId,
        stay: StayRange,
    ) -> Result<DraftReservation, CoreError> {
        let room = self.store.get_room_by_id(room_id).await?;
        if !self.availability.is_room_available(&stay, room_id).await? {
            return Err(CoreError::Conflict(format!(
                "{} is not available from {} to {}",
                room.room_name,
                stay.start_str(),
                stay.end_str()
            )));
        }

        let draft = DraftReservation::for_room(stay, &room);
        self.drafts.put(session, &draft).await?;
        log_stage(session, &draft);
        Ok(draft)
    }

    /// The draft to prefill the reservation form with.
    pub async fn reservation_form(
        &self,
        session: &SessionId,
    ) -> Result<DraftReservation, CoreError> {
        let draft = self.require_open_draft(session).await?;
        if draft.room_id.is_none() {
            return Err(CoreError::SessionState(MSG_NO_ROOM.into()));
        }
        Ok(draft)
    }

    /// Overlay the submitted guest details, validate, and commit.
    ///
    /// On validation failure the stored draft is left as it was. On a storage
    /// failure the error is returned and the draft stays in place for a retry.
    pub async fn submit_details(
        &self,
        session: &SessionId,
        details: GuestDetails,
    ) -> Result<SubmitOutcome, CoreError> {
        let mut draft = self.reservation_form(session).await?;
        draft.guest = details;

        let errors = draft.guest.validate();
        if !errors.is_valid() {
            tracing::debug!(
                %session,
                fields = ?errors.fields().collect::<Vec<_>>(),
                "Reservation form invalid"
            );
            return Ok(SubmitOutcome::Invalid { draft, errors });
        }

        let new_reservation = draft.to_new_reservation()?;
        let reservation = self
            .store
            .commit_reservation(&new_reservation)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    %session,
                    error = %e,
                    room_id = new_reservation.room_id,
                    "Reservation commit failed"
                )
            })?;

        draft.reservation_id = Some(reservation.id);
        self.drafts.put(session, &draft).await?;
        tracing::info!(
            %session,
            reservation_id = reservation.id,
            room_id = reservation.room_id,
            start = %reservation.stay.start(),
            end = %reservation.stay.end(),
            "Reservation committed"
        );
        Ok(SubmitOutcome::Committed(reservation))
    }

    /// Consume the committed draft for the summary page.
    ///
    /// The draft is removed as it is read, so a refresh finds nothing.
    pub async fn summary(&self, session: &SessionId) -> Result<DraftReservation, CoreError> {
        let draft = self.drafts.take(session).await?.ok_or_else(|| {
            tracing::warn!(%session, "Summary requested without a reservation in session");
            CoreError::SessionState(MSG_NO_DRAFT.into())
        })?;

        if draft.stage() != BookingStage::Committed {
            self.drafts.put(session, &draft).await?;
            return Err(CoreError::SessionState(MSG_NOT_COMMITTED.into()));
        }
        Ok(draft)
    }

    /// Single-room availability check for the JSON endpoint.
    pub async fn check_room(&self, stay: &StayRange, room_id: DbId) -> Result<bool, CoreError> {
        self.availability.is_room_available(stay, room_id).await
    }

    async fn require_draft(&self, session: &SessionId) -> Result<DraftReservation, CoreError> {
        self.drafts.get(session).await?.ok_or_else(|| {
            tracing::warn!(%session, "No reservation draft in session");
            CoreError::SessionState(MSG_NO_DRAFT.into())
        })
    }

    /// The session's draft, provided it has not been committed yet.
    async fn require_open_draft(
        &self,
        session: &SessionId,
    ) -> Result<DraftReservation, CoreError> {
        let draft = self.require_draft(session).await?;
        if draft.stage() == BookingStage::Committed {
            tracing::warn!(
                %session,
                reservation_id = ?draft.reservation_id,
                "Draft already committed"
            );
            return Err(CoreError::SessionState(MSG_ALREADY_COMMITTED.into()));
        }
        Ok(draft)
    }
}

fn log_stage(session: &SessionId, draft: &DraftReservation) {
    tracing::debug!(%session, stage = ?draft.stage(), room_id = ?draft.room_id, "Draft updated");
}
