pub mod analytics;
pub mod availability;
pub mod scoring;

use thiserror::Error;

use crate::models::ride::BookingStatus;

/// Rejections the domain rules can produce. All of them are recoverable:
/// the HTTP layer maps them to a client-facing error response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats { requested: i64, available: i64 },
    #[error("invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}
