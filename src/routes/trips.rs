use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, models::trip::TransportMode, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(log_trip))
        .route("/history", get(trip_history))
        .route("/analytics", get(trip_analytics))
}

#[derive(Deserialize)]
struct LogTripPayload {
    user_id: i64,
    transport_mode: TransportMode,
    distance_km: f64,
    trip_date: Option<NaiveDate>,
}

async fn log_trip(
    State(state): State<AppState>,
    Json(payload): Json<LogTripPayload>,
) -> Result<impl IntoResponse, AppError> {
    let logged = state
        .trips
        .log_trip(
            payload.user_id,
            payload.transport_mode,
            payload.distance_km,
            payload.trip_date,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Trip logged successfully",
            "trip_id": logged.trip_id,
            "co2_saved": logged.score.co2_saved_kg,
            "eco_points": logged.score.eco_points,
        })),
    ))
}

#[derive(Deserialize)]
struct UserQuery {
    user_id: i64,
}

async fn trip_history(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let trips = state.trips.history(query.user_id).await?;
    Ok(Json(json!({ "trips": trips })))
}

async fn trip_analytics(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = state
        .trips
        .analytics(query.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(report))
}
