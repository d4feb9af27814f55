use serde::Serialize;

use crate::domain::DomainError;
use crate::models::trip::TransportMode;

/// Per-mode scoring weights: the share of the car-baseline emission a trip
/// avoids, and the reward points earned per kilometre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeWeights {
    pub emission_share: f64,
    pub points_per_km: f64,
}

/// Immutable scoring configuration. Handlers use [`ScoringTable::default`];
/// tests can substitute their own table.
#[derive(Debug, Clone)]
pub struct ScoringTable {
    /// Average private-car emission in kg CO2 per km, the baseline every
    /// trip is compared against.
    pub baseline_emission_kg_per_km: f64,
    pub walk: ModeWeights,
    pub bike: ModeWeights,
    pub bus: ModeWeights,
    pub carpool: ModeWeights,
    /// Applies to `car` and to any unrecognized mode.
    pub fallback: ModeWeights,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            baseline_emission_kg_per_km: 0.21,
            walk: ModeWeights {
                emission_share: 1.0,
                points_per_km: 10.0,
            },
            bike: ModeWeights {
                emission_share: 1.0,
                points_per_km: 8.0,
            },
            bus: ModeWeights {
                emission_share: 0.7,
                points_per_km: 5.0,
            },
            carpool: ModeWeights {
                emission_share: 0.5,
                points_per_km: 3.0,
            },
            fallback: ModeWeights {
                emission_share: 0.0,
                points_per_km: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripScore {
    pub co2_saved_kg: f64,
    pub eco_points: f64,
}

impl ScoringTable {
    fn weights(&self, mode: TransportMode) -> ModeWeights {
        match mode {
            TransportMode::Walk => self.walk,
            TransportMode::Bike => self.bike,
            TransportMode::Bus => self.bus,
            TransportMode::Carpool => self.carpool,
            TransportMode::Car | TransportMode::Other => self.fallback,
        }
    }

    /// Scores a single trip. Negative (or NaN) distances are rejected rather
    /// than clamped; the caller surfaces that as a bad request.
    pub fn score(&self, mode: TransportMode, distance_km: f64) -> Result<TripScore, DomainError> {
        if distance_km.is_nan() || distance_km < 0.0 {
            return Err(DomainError::InvalidRequest(format!(
                "distance must be a non-negative number of km, got {distance_km}"
            )));
        }
        let weights = self.weights(mode);
        Ok(TripScore {
            co2_saved_kg: distance_km * self.baseline_emission_kg_per_km * weights.emission_share,
            eco_points: distance_km * weights.points_per_km,
        })
    }
}
