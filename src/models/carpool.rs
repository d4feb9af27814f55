use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CarpoolStatus {
    #[default]
    Active,
    Inactive,
}

impl CarpoolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarpoolStatus::Active => "active",
            CarpoolStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for CarpoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Carpool {
    pub id: i64,
    pub driver_id: i64,
    pub from_location: String,
    pub to_location: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub available_seats: i64,
    pub status: CarpoolStatus,
    pub created_at: DateTime<Utc>,
}
