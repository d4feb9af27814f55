use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::{FromRow, QueryBuilder};

use crate::{
    domain::DomainError,
    error::AppError,
    models::carpool::{Carpool, CarpoolStatus},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_carpool))
        .route("/search", get(search_carpools))
        .route("/driver/:driver_id", get(driver_carpools))
}

#[derive(Deserialize)]
struct CreateCarpoolPayload {
    driver_id: i64,
    from_location: String,
    to_location: String,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    available_seats: i64,
}

async fn create_carpool(
    State(state): State<AppState>,
    Json(payload): Json<CreateCarpoolPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.available_seats < 0 {
        return Err(DomainError::InvalidRequest(format!(
            "available_seats must be non-negative, got {}",
            payload.available_seats
        ))
        .into());
    }

    let carpool = sqlx::query_as::<_, Carpool>(
        r#"INSERT INTO carpools (driver_id, from_location, to_location, departure_date, departure_time, available_seats, status, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING *"#,
    )
    .bind(payload.driver_id)
    .bind(&payload.from_location)
    .bind(&payload.to_location)
    .bind(payload.departure_date)
    .bind(payload.departure_time)
    .bind(payload.available_seats)
    .bind(CarpoolStatus::Active)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Carpool created successfully",
            "carpool": carpool,
        })),
    ))
}

#[derive(Debug, serde::Serialize, FromRow)]
struct CarpoolWithDriver {
    #[sqlx(flatten)]
    #[serde(flatten)]
    carpool: Carpool,
    driver_name: String,
}

#[derive(Deserialize)]
struct SearchQuery {
    from: Option<String>,
    to: Option<String>,
    date: Option<NaiveDate>,
}

async fn search_carpools(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut qb = QueryBuilder::new(
        "SELECT c.*, u.username AS driver_name FROM carpools c \
         JOIN users u ON c.driver_id = u.id \
         WHERE c.status = 'active' AND c.available_seats > 0",
    );

    if let Some(from) = query.from.filter(|s| !s.is_empty()) {
        qb.push(" AND c.from_location LIKE ")
            .push_bind(format!("%{from}%"));
    }
    if let Some(to) = query.to.filter(|s| !s.is_empty()) {
        qb.push(" AND c.to_location LIKE ")
            .push_bind(format!("%{to}%"));
    }
    if let Some(date) = query.date {
        qb.push(" AND c.departure_date = ").push_bind(date);
    }
    qb.push(" ORDER BY c.departure_date ASC, c.departure_time ASC");

    let carpools = qb
        .build_query_as::<CarpoolWithDriver>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(json!({ "carpools": carpools })))
}

async fn driver_carpools(
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let carpools = sqlx::query_as::<_, CarpoolWithDriver>(
        "SELECT c.*, u.username AS driver_name FROM carpools c \
         JOIN users u ON c.driver_id = u.id \
         WHERE c.driver_id = ? \
         ORDER BY c.departure_date DESC, c.departure_time DESC",
    )
    .bind(driver_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(json!({ "carpools": carpools })))
}
