pub mod booking;
pub mod health;
pub mod room;

use axum::middleware;
use axum::Router;

use crate::session::session_middleware;
use crate::state::AppState;

/// Build the session-scoped application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                                home (flash)
/// /search-availability                             search page, search (POST)
/// /search-availability-json                        single-room check (POST)
/// /choose-room/{id}                                attach room to draft
/// /book-room                                       direct booking link
/// /make-reservation                                form, submit (POST)
/// /reservation-summary                             read-once summary
///
/// /rooms                                           list
/// /rooms/{id}                                      get
/// ```
///
/// Every route here runs behind the session middleware, which issues the
/// `booking_session` cookie on first contact.
pub fn app_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(booking::router())
        .nest("/rooms", room::router())
        .layer(middleware::from_fn_with_state(state, session_middleware))
}
