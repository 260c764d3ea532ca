//! Handlers for the booking journey: search, choose, reserve, summarize.
//!
//! Session-state failures (no draft where one is expected) never surface as
//! error bodies here. They become a flash message and a `303 See Other` to a
//! safe starting page.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use bookings_core::booking::Room;
use bookings_core::draft::{DraftReservation, FlashMessage, SessionId};
use bookings_core::error::CoreError;
use bookings_core::stay::StayRange;
use bookings_core::types::DbId;
use bookings_core::validation::{FormErrors, GuestDetails};
use bookings_core::workflow::{SearchOutcome, SubmitOutcome};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::{AvailabilityResponse, DataResponse};
use crate::session::Session;
use crate::state::AppState;

pub const MSG_NO_AVAILABILITY: &str = "No availability";

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Date range submitted by the search form.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// Single-room availability query.
#[derive(Debug, Deserialize)]
pub struct AvailabilityForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub room_id: String,
}

/// Query string of a direct booking link.
#[derive(Debug, Deserialize)]
pub struct BookRoomQuery {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "s")]
    pub start: String,
    #[serde(default, alias = "e")]
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct FlashPage {
    pub flash: Option<FlashMessage>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub rooms: Vec<Room>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct ReservationPage {
    pub reservation: DraftReservation,
    pub start_date: String,
    pub end_date: String,
}

impl From<DraftReservation> for ReservationPage {
    fn from(reservation: DraftReservation) -> Self {
        Self {
            start_date: reservation.stay.start_str(),
            end_date: reservation.stay.end_str(),
            reservation,
        }
    }
}

/// Body of a rejected reservation form: the entered values plus errors.
#[derive(Debug, Serialize)]
pub struct InvalidReservation {
    pub reservation: DraftReservation,
    pub errors: FormErrors,
}

// ---------------------------------------------------------------------------
// Landing pages
// ---------------------------------------------------------------------------

/// GET /
///
/// Returns and clears the session's pending flash message.
pub async fn home(
    State(state): State<AppState>,
    Session(session): Session,
) -> AppResult<Json<DataResponse<FlashPage>>> {
    flash_page(&state, &session).await
}

/// GET /search-availability
pub async fn search_page(
    State(state): State<AppState>,
    Session(session): Session,
) -> AppResult<Json<DataResponse<FlashPage>>> {
    flash_page(&state, &session).await
}

async fn flash_page(
    state: &AppState,
    session: &SessionId,
) -> AppResult<Json<DataResponse<FlashPage>>> {
    let flash = state.workflow.drafts().take_flash(session).await?;
    Ok(Json(DataResponse {
        data: FlashPage { flash },
    }))
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// POST /search-availability
///
/// Lists free rooms and starts a new draft for the stay. With nothing free,
/// flashes "No availability" and sends the visitor back to the search page.
pub async fn search_availability(
    State(state): State<AppState>,
    Session(session): Session,
    Form(form): Form<SearchForm>,
) -> AppResult<Response> {
    let stay = StayRange::parse(&form.start, &form.end)?;

    match state.workflow.search(&session, stay).await? {
        SearchOutcome::NoAvailability => {
            flash_redirect(
                &state,
                &session,
                FlashMessage::error(MSG_NO_AVAILABILITY),
                "/search-availability",
            )
            .await
        }
        SearchOutcome::RoomsOffered { rooms, draft } => Ok(Json(DataResponse {
            data: SearchResults {
                rooms,
                start_date: draft.stay.start_str(),
                end_date: draft.stay.end_str(),
            },
        })
        .into_response()),
    }
}

/// POST /search-availability-json
///
/// Answers whether one room is free for a range. Touches no session state.
pub async fn search_availability_json(
    State(state): State<AppState>,
    Form(form): Form<AvailabilityForm>,
) -> AppResult<Json<AvailabilityResponse>> {
    let stay = StayRange::parse(&form.start, &form.end).map_err(|e| match e {
        CoreError::Validation(msg) => AppError::BadRequest(msg),
        other => AppError::Core(other),
    })?;
    let room_id = parse_room_id(&form.room_id)?;

    let ok = state.workflow.check_room(&stay, room_id).await?;

    Ok(Json(AvailabilityResponse {
        ok,
        message: String::new(),
        room_id: room_id.to_string(),
        start_date: stay.start_str(),
        end_date: stay.end_str(),
    }))
}

// ---------------------------------------------------------------------------
// Room selection
// ---------------------------------------------------------------------------

/// GET /choose-room/{id}
pub async fn choose_room(
    State(state): State<AppState>,
    Session(session): Session,
    Path(raw_id): Path<String>,
) -> AppResult<Response> {
    let room_id = parse_room_id(&raw_id)?;
    match state.workflow.choose_room(&session, room_id).await {
        Ok(_) => Ok(Redirect::to("/make-reservation").into_response()),
        Err(CoreError::SessionState(msg)) => {
            flash_redirect(&state, &session, FlashMessage::error(msg), "/").await
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /book-room?id=&start=&end=
///
/// Starts a booking straight from a room page link.
pub async fn book_room(
    State(state): State<AppState>,
    Session(session): Session,
    Query(query): Query<BookRoomQuery>,
) -> AppResult<Response> {
    let room_id = parse_room_id(&query.id)?;
    let stay = StayRange::parse(&query.start, &query.end)?;

    match state.workflow.book_room(&session, room_id, stay).await {
        Ok(_) => Ok(Redirect::to("/make-reservation").into_response()),
        Err(CoreError::Conflict(msg)) => {
            flash_redirect(
                &state,
                &session,
                FlashMessage::error(msg),
                "/search-availability",
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Reservation form
// ---------------------------------------------------------------------------

/// GET /make-reservation
pub async fn reservation_form(
    State(state): State<AppState>,
    Session(session): Session,
) -> AppResult<Response> {
    match state.workflow.reservation_form(&session).await {
        Ok(draft) => Ok(Json(DataResponse {
            data: ReservationPage::from(draft),
        })
        .into_response()),
        Err(CoreError::SessionState(msg)) => {
            flash_redirect(&state, &session, FlashMessage::error(msg), "/").await
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /make-reservation
///
/// Invalid details are echoed back with per-field errors (422). A valid
/// form commits the reservation and redirects to the summary. Losing a race
/// for the room surfaces as 409.
pub async fn submit_reservation(
    State(state): State<AppState>,
    Session(session): Session,
    Form(details): Form<GuestDetails>,
) -> AppResult<Response> {
    match state.workflow.submit_details(&session, details).await {
        Ok(SubmitOutcome::Committed(_)) => {
            Ok(Redirect::to("/reservation-summary").into_response())
        }
        Ok(SubmitOutcome::Invalid { draft, errors }) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(DataResponse {
                data: InvalidReservation {
                    reservation: draft,
                    errors,
                },
            }),
        )
            .into_response()),
        Err(CoreError::SessionState(msg)) => {
            flash_redirect(&state, &session, FlashMessage::error(msg), "/").await
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// GET /reservation-summary
///
/// Read-once: the draft is consumed, so a refresh lands back on `/` with a
/// flash message.
pub async fn reservation_summary(
    State(state): State<AppState>,
    Session(session): Session,
) -> AppResult<Response> {
    match state.workflow.summary(&session).await {
        Ok(draft) => Ok(Json(DataResponse {
            data: ReservationPage::from(draft),
        })
        .into_response()),
        Err(CoreError::SessionState(msg)) => {
            flash_redirect(&state, &session, FlashMessage::error(msg), "/").await
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn flash_redirect(
    state: &AppState,
    session: &SessionId,
    flash: FlashMessage,
    to: &str,
) -> AppResult<Response> {
    tracing::info!(%session, message = %flash.message, to, "Redirecting with flash");
    state.workflow.drafts().put_flash(session, &flash).await?;
    Ok(Redirect::to(to).into_response())
}

fn parse_room_id(raw: &str) -> AppResult<DbId> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid room id '{raw}'")))
}
