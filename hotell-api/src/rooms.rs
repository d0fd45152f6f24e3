use axum::{extract::State, routing::get, Json, Router};
use hotell_catalog::{Availability, RoomType};
use serde::Serialize;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypesResponse {
    pub room_types: Vec<RoomType>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_room_types))
        .route("/rooms/availability", get(availability))
}

async fn list_room_types(State(state): State<AppState>) -> Json<RoomTypesResponse> {
    Json(RoomTypesResponse {
        room_types: state.bookings.room_types().to_vec(),
    })
}

async fn availability(State(state): State<AppState>) -> Json<Availability> {
    Json(state.bookings.availability().await)
}
