use crate::domain::DomainError;
use crate::models::ride::{Booking, BookingStatus};

/// Decides whether a booking for `requested` seats is admissible against a
/// ride snapshot with `available` seats, and returns the post-booking seat
/// count. Pure decision logic: the caller must persist the decrement
/// atomically (conditional update) so two concurrent bookings cannot both
/// win the same seats.
pub fn reserve_seats(available: i64, requested: i64) -> Result<i64, DomainError> {
    if requested < 1 {
        return Err(DomainError::InvalidRequest(format!(
            "seats_booked must be at least 1, got {requested}"
        )));
    }
    if requested > available {
        return Err(DomainError::InsufficientSeats {
            requested,
            available,
        });
    }
    Ok(available - requested)
}

/// Legal booking status transitions. Cancelled is terminal; nothing moves
/// back into pending.
pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<(), DomainError> {
    use BookingStatus::*;
    match (from, to) {
        (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) => Ok(()),
        _ => Err(DomainError::InvalidTransition { from, to }),
    }
}

/// Seat count after cancelling `booking` against a ride with `available`
/// seats. Only bookings still holding seats (pending or confirmed) can
/// release them.
pub fn release_seats(available: i64, booking: &Booking) -> Result<i64, DomainError> {
    transition(booking.status, BookingStatus::Cancelled)?;
    Ok(available + booking.seats_booked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn booking(seats: i64, status: BookingStatus) -> Booking {
        Booking {
            id: 1,
            ride_id: 1,
            passenger_id: 2,
            seats_booked: seats,
            status,
            booked_at: Utc::now(),
        }
    }

    #[test]
    fn booking_within_capacity_returns_remaining_seats() {
        assert_eq!(reserve_seats(3, 2), Ok(1));
        assert_eq!(reserve_seats(3, 3), Ok(0));
    }

    #[test]
    fn overbooking_is_rejected() {
        assert_eq!(
            reserve_seats(3, 4),
            Err(DomainError::InsufficientSeats {
                requested: 4,
                available: 3,
            })
        );
    }

    #[test]
    fn zero_or_negative_seat_requests_are_rejected() {
        assert!(matches!(
            reserve_seats(3, 0),
            Err(DomainError::InvalidRequest(_))
        ));
        assert!(matches!(
            reserve_seats(3, -1),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn allowed_transitions() {
        use BookingStatus::*;
        assert!(transition(Pending, Confirmed).is_ok());
        assert!(transition(Pending, Cancelled).is_ok());
        assert!(transition(Confirmed, Cancelled).is_ok());
    }

    #[test]
    fn cancelled_is_terminal_and_nothing_reenters_pending() {
        use BookingStatus::*;
        for to in [Pending, Confirmed] {
            assert_eq!(
                transition(Cancelled, to),
                Err(DomainError::InvalidTransition {
                    from: Cancelled,
                    to,
                })
            );
        }
        assert!(transition(Confirmed, Pending).is_err());
        assert!(transition(Pending, Pending).is_err());
    }

    #[test]
    fn cancelling_restores_capacity() {
        let b = booking(2, BookingStatus::Confirmed);
        assert_eq!(release_seats(1, &b), Ok(3));
    }

    #[test]
    fn cancelled_booking_cannot_release_again() {
        let b = booking(2, BookingStatus::Cancelled);
        assert!(matches!(
            release_seats(1, &b),
            Err(DomainError::InvalidTransition { .. })
        ));
    }
}
