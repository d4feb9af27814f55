use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::trip::{TransportMode, Trip};

/// Aggregate over one transport mode within the weekly window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModeSummary {
    pub trip_count: u64,
    pub total_distance: f64,
    pub total_co2_saved: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LifetimeTotals {
    pub total_trips: u64,
    pub total_distance: f64,
    pub total_co2_saved: f64,
}

/// Per-mode aggregates over the trips dated within the last 7 days before
/// `reference` (inclusive lower bound). Trips with a missing distance count
/// toward trip_count but contribute 0 km.
pub fn weekly_breakdown(
    trips: &[Trip],
    reference: NaiveDate,
) -> BTreeMap<TransportMode, ModeSummary> {
    let window_start = reference - Duration::days(7);
    let mut breakdown: BTreeMap<TransportMode, ModeSummary> = BTreeMap::new();
    for trip in trips.iter().filter(|t| t.trip_date >= window_start) {
        let entry = breakdown.entry(trip.transport_mode).or_default();
        entry.trip_count += 1;
        entry.total_distance += trip.distance_km.unwrap_or(0.0);
        entry.total_co2_saved += trip.co2_saved_kg;
    }
    breakdown
}

/// Totals over a user's entire trip history. The user's eco_score is a
/// separately maintained counter and is fetched alongside, never recomputed
/// from these records.
pub fn lifetime_totals(trips: &[Trip]) -> LifetimeTotals {
    trips.iter().fold(LifetimeTotals::default(), |acc, trip| {
        LifetimeTotals {
            total_trips: acc.total_trips + 1,
            total_distance: acc.total_distance + trip.distance_km.unwrap_or(0.0),
            total_co2_saved: acc.total_co2_saved + trip.co2_saved_kg,
        }
    })
}
