//! Route definitions for the booking journey.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Booking routes, mounted at the root.
///
/// ```text
/// GET    /                                  -> home (pending flash)
/// GET    /search-availability               -> search_page (pending flash)
/// POST   /search-availability               -> search_availability
/// POST   /search-availability-json          -> search_availability_json
/// GET    /choose-room/{id}                  -> choose_room
/// GET    /book-room?id=&start=&end=         -> book_room
/// GET    /make-reservation                  -> reservation_form
/// POST   /make-reservation                  -> submit_reservation
/// GET    /reservation-summary               -> reservation_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::home))
        .route(
            "/search-availability",
            get(booking::search_page).post(booking::search_availability),
        )
        .route(
            "/search-availability-json",
            post(booking::search_availability_json),
        )
        .route("/choose-room/{id}", get(booking::choose_room))
        .route("/book-room", get(booking::book_room))
        .route(
            "/make-reservation",
            get(booking::reservation_form).post(booking::submit_reservation),
        )
        .route("/reservation-summary", get(booking::reservation_summary))
}
