use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, models::ride::BookingStatus, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/:id", patch(update_booking).delete(delete_booking))
}

#[derive(Deserialize)]
struct CreateBookingPayload {
    ride_id: i64,
    passenger_id: i64,
    seats_booked: i64,
}

async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .bookings
        .create(payload.ride_id, payload.passenger_id, payload.seats_booked)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Booking created successfully",
            "booking": booking,
        })),
    ))
}

#[derive(Deserialize)]
struct ListQuery {
    passenger_id: Option<i64>,
    ride_id: Option<i64>,
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state
        .bookings
        .list(query.passenger_id, query.ride_id)
        .await?;
    Ok(Json(json!({ "bookings": bookings })))
}

#[derive(Deserialize)]
struct UpdateBookingPayload {
    status: BookingStatus,
}

async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.bookings.set_status(id, payload.status).await?;
    Ok(Json(json!({ "message": "Booking updated", "booking": booking })))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.bookings.delete(id).await?;
    Ok(Json(json!({ "message": "Booking deleted" })))
}
