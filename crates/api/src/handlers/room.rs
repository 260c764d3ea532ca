//! Handlers for the `/rooms` resource.

use axum::extract::{Path, State};
use axum::Json;
use bookings_core::booking::Room;
use bookings_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /rooms
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Room>>>> {
    let rooms = state.store.list_rooms().await?;
    Ok(Json(DataResponse { data: rooms }))
}

/// GET /rooms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Room>>> {
    let room = state.store.get_room_by_id(id).await?;
    Ok(Json(DataResponse { data: room }))
}
