use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use hotell_shared::{Booking, BookingRequest, BookingSummary};
use serde::Serialize;
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub booking: BookingSummary,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub count: usize,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct BookingUpdatedResponse {
    pub message: &'static str,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCanceledResponse {
    pub message: &'static str,
    pub booking_id: String,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).put(update_booking).delete(cancel_booking),
        )
}

async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), AppError> {
    let Json(request) = payload?;
    let booking = state.bookings.create_booking(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            message: "Booking successful",
            booking,
        }),
    ))
}

async fn list_bookings(State(state): State<AppState>) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = state.bookings.list_bookings().await?;
    Ok(Json(BookingListResponse {
        count: bookings.len(),
        bookings,
    }))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get_booking(&id).await?))
}

async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingUpdatedResponse>, AppError> {
    let Json(request) = payload?;
    let booking = state.bookings.update_booking(&id, request).await?;

    Ok(Json(BookingUpdatedResponse {
        message: "Booking updated",
        booking,
    }))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingCanceledResponse>, AppError> {
    let booking = state.bookings.cancel_booking(&id, Utc::now()).await?;

    Ok(Json(BookingCanceledResponse {
        message: "Booking canceled",
        booking_id: booking.id,
    }))
}
