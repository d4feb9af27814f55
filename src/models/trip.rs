use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Closed set of transport modes. Anything the client sends that we do not
/// recognize lands on `Other`, which scores like a private car.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TransportMode {
    Walk,
    Bike,
    Bus,
    Carpool,
    Car,
    #[serde(other)]
    Other,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walk => "walk",
            TransportMode::Bike => "bike",
            TransportMode::Bus => "bus",
            TransportMode::Carpool => "carpool",
            TransportMode::Car => "car",
            TransportMode::Other => "other",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A logged trip. co2_saved_kg and eco_points are computed once at logging
/// time and stored with the record; later formula changes do not touch
/// already-logged trips.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub transport_mode: TransportMode,
    pub distance_km: Option<f64>,
    pub co2_saved_kg: f64,
    pub eco_points: f64,
    pub trip_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
