use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::{
    db::DbPool,
    domain::{
        analytics::{self, ModeSummary},
        scoring::{ScoringTable, TripScore},
    },
    error::AppError,
    models::trip::{TransportMode, Trip},
};

/// Trip logging and analytics over a user's trip history.
#[derive(Clone)]
pub struct TripService {
    db: DbPool,
    scoring: ScoringTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedTrip {
    pub trip_id: i64,
    #[serde(flatten)]
    pub score: TripScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalStats {
    pub total_trips: u64,
    pub total_distance: f64,
    pub total_co2_saved: f64,
    pub eco_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub weekly_analytics: BTreeMap<TransportMode, ModeSummary>,
    pub total_stats: TotalStats,
}

impl TripService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            scoring: ScoringTable::default(),
        }
    }

    pub fn with_scoring(db: DbPool, scoring: ScoringTable) -> Self {
        Self { db, scoring }
    }

    /// Scores and persists a trip, crediting the user's eco_score in the
    /// same transaction. The stored co2/points values are frozen; they are
    /// never recomputed from the trip later.
    pub async fn log_trip(
        &self,
        user_id: i64,
        mode: TransportMode,
        distance_km: f64,
        trip_date: Option<NaiveDate>,
    ) -> Result<LoggedTrip, AppError> {
        let score = self.scoring.score(mode, distance_km)?;
        let trip_date = trip_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let trip_id = sqlx::query(
            r#"INSERT INTO trips (user_id, transport_mode, distance_km, co2_saved_kg, eco_points, trip_date, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(mode)
        .bind(distance_km)
        .bind(score.co2_saved_kg)
        .bind(score.eco_points)
        .bind(trip_date)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let credited = sqlx::query("UPDATE users SET eco_score = eco_score + ? WHERE id = ?")
            .bind(score.eco_points)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if credited.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        tx.commit().await?;

        Ok(LoggedTrip { trip_id, score })
    }

    /// Most recent trips first, capped at 50.
    pub async fn history(&self, user_id: i64) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE user_id = ? ORDER BY trip_date DESC, created_at DESC LIMIT 50",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(trips)
    }

    /// Weekly per-mode breakdown plus lifetime totals and the stored
    /// eco_score counter.
    pub async fn analytics(
        &self,
        user_id: i64,
        reference: NaiveDate,
    ) -> Result<AnalyticsReport, AppError> {
        let eco_score: f64 = sqlx::query_scalar("SELECT eco_score FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let trips = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        let weekly_analytics = analytics::weekly_breakdown(&trips, reference);
        let totals = analytics::lifetime_totals(&trips);

        Ok(AnalyticsReport {
            weekly_analytics,
            total_stats: TotalStats {
                total_trips: totals.total_trips,
                total_distance: totals.total_distance,
                total_co2_saved: totals.total_co2_saved,
                eco_score,
            },
        })
    }
}
