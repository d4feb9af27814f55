use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::{FromRow, QueryBuilder};

use crate::{
    domain::DomainError,
    error::AppError,
    models::ride::Ride,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_ride))
        .route("/search", get(search_rides))
        .route("/driver/:driver_id", get(driver_rides))
        .route("/:id", get(get_ride).patch(update_ride))
}

#[derive(Deserialize)]
struct CreateRidePayload {
    driver_id: i64,
    vehicle_id: Option<i64>,
    start_location: String,
    end_location: String,
    departure_time: DateTime<Utc>,
    available_seats: i64,
    fare: Option<f64>,
}

async fn create_ride(
    State(state): State<AppState>,
    Json(payload): Json<CreateRidePayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.available_seats < 0 {
        return Err(DomainError::InvalidRequest(format!(
            "available_seats must be non-negative, got {}",
            payload.available_seats
        ))
        .into());
    }
    if let Some(fare) = payload.fare {
        if fare < 0.0 {
            return Err(DomainError::InvalidRequest(format!(
                "fare must be non-negative, got {fare}"
            ))
            .into());
        }
    }

    let ride = sqlx::query_as::<_, Ride>(
        r#"INSERT INTO rides (driver_id, vehicle_id, start_location, end_location, departure_time, available_seats, fare, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING *"#,
    )
    .bind(payload.driver_id)
    .bind(payload.vehicle_id)
    .bind(&payload.start_location)
    .bind(&payload.end_location)
    .bind(payload.departure_time)
    .bind(payload.available_seats)
    .bind(payload.fare)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Ride created successfully", "ride": ride })),
    ))
}

#[derive(Debug, serde::Serialize, FromRow)]
struct RideWithDriver {
    #[sqlx(flatten)]
    #[serde(flatten)]
    ride: Ride,
    driver_name: String,
}

#[derive(Deserialize)]
struct SearchQuery {
    from: Option<String>,
    to: Option<String>,
    date: Option<NaiveDate>,
    min_seats: Option<i64>,
}

async fn search_rides(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let min_seats = query.min_seats.unwrap_or(1);

    let mut qb = QueryBuilder::new(
        "SELECT r.*, u.username AS driver_name FROM rides r \
         JOIN users u ON r.driver_id = u.id WHERE r.available_seats >= ",
    );
    qb.push_bind(min_seats);

    if let Some(from) = query.from.filter(|s| !s.is_empty()) {
        qb.push(" AND r.start_location LIKE ")
            .push_bind(format!("%{from}%"));
    }
    if let Some(to) = query.to.filter(|s| !s.is_empty()) {
        qb.push(" AND r.end_location LIKE ")
            .push_bind(format!("%{to}%"));
    }
    if let Some(date) = query.date {
        // departure_time is a full timestamp; match the whole day.
        let day_start = date.and_hms_opt(0, 0, 0).expect("valid time").and_utc();
        let day_end = date.and_hms_opt(23, 59, 59).expect("valid time").and_utc();
        qb.push(" AND r.departure_time >= ").push_bind(day_start);
        qb.push(" AND r.departure_time <= ").push_bind(day_end);
    }
    qb.push(" ORDER BY r.departure_time ASC");

    let rides = qb
        .build_query_as::<RideWithDriver>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(json!({ "rides": rides })))
}

async fn driver_rides(
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let rides = sqlx::query_as::<_, Ride>(
        "SELECT * FROM rides WHERE driver_id = ? ORDER BY departure_time DESC",
    )
    .bind(driver_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(json!({ "rides": rides })))
}

async fn get_ride(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let ride = sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(json!({ "ride": ride })))
}

/// Allow-listed ride fields a driver may edit after posting.
#[derive(Deserialize)]
struct UpdateRidePayload {
    available_seats: Option<i64>,
    fare: Option<f64>,
    start_location: Option<String>,
    end_location: Option<String>,
    departure_time: Option<DateTime<Utc>>,
    vehicle_id: Option<i64>,
}

impl UpdateRidePayload {
    fn is_empty(&self) -> bool {
        self.available_seats.is_none()
            && self.fare.is_none()
            && self.start_location.is_none()
            && self.end_location.is_none()
            && self.departure_time.is_none()
            && self.vehicle_id.is_none()
    }
}

async fn update_ride(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRidePayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.is_empty() {
        return Err(AppError::BadRequest("no updatable fields provided".into()));
    }
    if let Some(seats) = payload.available_seats {
        if seats < 0 {
            return Err(DomainError::InvalidRequest(format!(
                "available_seats must be non-negative, got {seats}"
            ))
            .into());
        }
    }

    let mut qb = QueryBuilder::new("UPDATE rides SET ");
    let mut fields = qb.separated(", ");
    if let Some(seats) = payload.available_seats {
        fields.push("available_seats = ").push_bind_unseparated(seats);
    }
    if let Some(fare) = payload.fare {
        fields.push("fare = ").push_bind_unseparated(fare);
    }
    if let Some(start) = payload.start_location {
        fields.push("start_location = ").push_bind_unseparated(start);
    }
    if let Some(end) = payload.end_location {
        fields.push("end_location = ").push_bind_unseparated(end);
    }
    if let Some(departure) = payload.departure_time {
        fields
            .push("departure_time = ")
            .push_bind_unseparated(departure);
    }
    if let Some(vehicle) = payload.vehicle_id {
        fields.push("vehicle_id = ").push_bind_unseparated(vehicle);
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING *");

    let ride = qb
        .build_query_as::<Ride>()
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({ "message": "Ride updated", "ride": ride })))
}
