//! Postgres implementations of the booking and draft-store ports.

use std::time::Duration;

use async_trait::async_trait;
use bookings_core::booking::{NewReservation, NewRoomRestriction, Reservation, Room};
use bookings_core::deadline::{with_deadline, STORAGE_OP_TIMEOUT};
use bookings_core::draft::{DraftReservation, FlashMessage, SessionId};
use bookings_core::error::CoreError;
use bookings_core::ports::{BookingStore, DraftStore};
use bookings_core::stay::StayRange;
use bookings_core::types::DbId;
use chrono::Utc;

use crate::repositories::{BookingSessionRepo, ReservationRepo, RoomRepo, RoomRestrictionRepo};
use crate::DbPool;

/// PostgreSQL exclusion constraint violation.
const EXCLUSION_VIOLATION: &str = "23P01";
/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Default lifetime of a booking session.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Translate a sqlx error into the domain error, logging the cause.
pub fn map_db_error(operation: &'static str, err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(EXCLUSION_VIOLATION) | Some(UNIQUE_VIOLATION) => {
                tracing::warn!(
                    operation,
                    constraint = ?db_err.constraint(),
                    "Overlapping room restriction rejected"
                );
                CoreError::Conflict("The room is no longer available for the selected dates".into())
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                tracing::warn!(
                    operation,
                    constraint = ?db_err.constraint(),
                    "Foreign key violation"
                );
                CoreError::Validation("Referenced room does not exist".into())
            }
            _ => {
                tracing::error!(operation, error = %db_err, "Database error");
                CoreError::Storage(format!("{operation} failed: {db_err}"))
            }
        },
        sqlx::Error::PoolTimedOut => {
            tracing::error!(operation, "Timed out acquiring a database connection");
            CoreError::Storage(format!("{operation} failed: connection pool exhausted"))
        }
        other => {
            tracing::error!(operation, error = %other, "Database error");
            CoreError::Storage(format!("{operation} failed: {other}"))
        }
    }
}

/// [`BookingStore`] over a Postgres pool.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: DbPool,
    op_timeout: Duration,
}

impl PgBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            op_timeout: STORAGE_OP_TIMEOUT,
        }
    }

    /// Override the per-operation deadline.
    pub fn with_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert_reservation(&self, reservation: &NewReservation) -> Result<DbId, CoreError> {
        with_deadline("insert_reservation", self.op_timeout, async {
            ReservationRepo::create(&self.pool, reservation)
                .await
                .map(|row| row.id)
                .map_err(|e| map_db_error("insert_reservation", e))
        })
        .await
    }

    async fn insert_room_restriction(
        &self,
        restriction: &NewRoomRestriction,
    ) -> Result<(), CoreError> {
        with_deadline("insert_room_restriction", self.op_timeout, async {
            RoomRestrictionRepo::create(&self.pool, restriction)
                .await
                .map(|_| ())
                .map_err(|e| map_db_error("insert_room_restriction", e))
        })
        .await
    }

    async fn search_availability_for_all_rooms(
        &self,
        stay: &StayRange,
    ) -> Result<Vec<Room>, CoreError> {
        with_deadline("search_availability_for_all_rooms", self.op_timeout, async {
            RoomRepo::list_available(&self.pool, stay.start(), stay.end())
                .await
                .map(|rows| rows.into_iter().map(Room::from).collect())
                .map_err(|e| map_db_error("search_availability_for_all_rooms", e))
        })
        .await
    }

    async fn search_availability_by_dates_by_room_id(
        &self,
        stay: &StayRange,
        room_id: DbId,
    ) -> Result<bool, CoreError> {
        with_deadline(
            "search_availability_by_dates_by_room_id",
            self.op_timeout,
            async {
                RoomRepo::is_available(&self.pool, room_id, stay.start(), stay.end())
                    .await
                    .map_err(|e| map_db_error("search_availability_by_dates_by_room_id", e))
            },
        )
        .await
    }

    async fn get_room_by_id(&self, room_id: DbId) -> Result<Room, CoreError> {
        let row = with_deadline("get_room_by_id", self.op_timeout, async {
            RoomRepo::find_by_id(&self.pool, room_id)
                .await
                .map_err(|e| map_db_error("get_room_by_id", e))
        })
        .await?;
        row.map(Room::from).ok_or(CoreError::NotFound {
            entity: "room",
            id: room_id,
        })
    }

    async fn commit_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, CoreError> {
        let limit = self.op_timeout;

        // Dropping `tx` on any early return rolls the transaction back.
        let mut tx = with_deadline("begin_commit", limit, async {
            self.pool
                .begin()
                .await
                .map_err(|e| map_db_error("begin_commit", e))
        })
        .await?;

        let row = with_deadline("insert_reservation", limit, async {
            ReservationRepo::create(&mut *tx, reservation)
                .await
                .map_err(|e| map_db_error("insert_reservation", e))
        })
        .await?;

        let restriction =
            NewRoomRestriction::for_reservation(row.id, reservation.room_id, reservation.stay);
        with_deadline("insert_room_restriction", limit, async {
            RoomRestrictionRepo::create(&mut *tx, &restriction)
                .await
                .map_err(|e| map_db_error("insert_room_restriction", e))
        })
        .await?;

        with_deadline("commit", limit, async {
            tx.commit().await.map_err(|e| map_db_error("commit", e))
        })
        .await?;

        tracing::debug!(
            reservation_id = row.id,
            room_id = row.room_id,
            "Reservation and restriction committed"
        );
        Reservation::try_from(row)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, CoreError> {
        with_deadline("list_rooms", self.op_timeout, async {
            RoomRepo::list(&self.pool)
                .await
                .map(|rows| rows.into_iter().map(Room::from).collect())
                .map_err(|e| map_db_error("list_rooms", e))
        })
        .await
    }

    async fn ping(&self) -> Result<(), CoreError> {
        with_deadline("ping", self.op_timeout, async {
            crate::health_check(&self.pool)
                .await
                .map_err(|e| map_db_error("ping", e))
        })
        .await
    }
}

/// [`DraftStore`] over the `booking_sessions` table.
///
/// Every write pushes the session's expiry out by the configured lifetime.
#[derive(Clone)]
pub struct PgDraftStore {
    pool: DbPool,
    ttl: chrono::Duration,
    op_timeout: Duration,
}

impl PgDraftStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            ttl: chrono::Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            op_timeout: STORAGE_OP_TIMEOUT,
        }
    }

    /// Override the session lifetime.
    pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn expires_at(&self) -> bookings_core::types::Timestamp {
        Utc::now() + self.ttl
    }
}

#[async_trait]
impl DraftStore for PgDraftStore {
    async fn get(&self, session: &SessionId) -> Result<Option<DraftReservation>, CoreError> {
        let payload = with_deadline("get_draft", self.op_timeout, async {
            BookingSessionRepo::find_draft(&self.pool, session.as_str())
                .await
                .map_err(|e| map_db_error("get_draft", e))
        })
        .await?;
        payload.map(DraftReservation::decode).transpose()
    }

    async fn put(&self, session: &SessionId, draft: &DraftReservation) -> Result<(), CoreError> {
        let encoded = draft.encode()?;
        let expires_at = self.expires_at();
        with_deadline("put_draft", self.op_timeout, async {
            BookingSessionRepo::upsert_draft(&self.pool, session.as_str(), &encoded, expires_at)
                .await
                .map_err(|e| map_db_error("put_draft", e))
        })
        .await
    }

    async fn remove(&self, session: &SessionId) -> Result<(), CoreError> {
        with_deadline("remove_draft", self.op_timeout, async {
            BookingSessionRepo::clear_draft(&self.pool, session.as_str())
                .await
                .map(|_| ())
                .map_err(|e| map_db_error("remove_draft", e))
        })
        .await
    }

    async fn take(&self, session: &SessionId) -> Result<Option<DraftReservation>, CoreError> {
        let payload = with_deadline("take_draft", self.op_timeout, async {
            BookingSessionRepo::take_draft(&self.pool, session.as_str())
                .await
                .map_err(|e| map_db_error("take_draft", e))
        })
        .await?;
        payload.map(DraftReservation::decode).transpose()
    }

    async fn put_flash(&self, session: &SessionId, flash: &FlashMessage) -> Result<(), CoreError> {
        let encoded = serde_json::to_value(flash)
            .map_err(|e| CoreError::Internal(format!("Failed to encode flash message: {e}")))?;
        let expires_at = self.expires_at();
        with_deadline("put_flash", self.op_timeout, async {
            BookingSessionRepo::upsert_flash(&self.pool, session.as_str(), &encoded, expires_at)
                .await
                .map_err(|e| map_db_error("put_flash", e))
        })
        .await
    }

    async fn take_flash(&self, session: &SessionId) -> Result<Option<FlashMessage>, CoreError> {
        let payload = with_deadline("take_flash", self.op_timeout, async {
            BookingSessionRepo::take_flash(&self.pool, session.as_str())
                .await
                .map_err(|e| map_db_error("take_flash", e))
        })
        .await?;

        // A flash that no longer decodes is dropped rather than failing the page.
        Ok(payload.and_then(|value| match serde_json::from_value(value) {
            Ok(flash) => Some(flash),
            Err(e) => {
                tracing::warn!(%session, error = %e, "Discarding unreadable flash message");
                None
            }
        }))
    }
}
