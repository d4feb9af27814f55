use chrono::Utc;
use sqlx::QueryBuilder;
use tracing::warn;

use crate::{
    db::DbPool,
    domain::{availability, DomainError},
    error::AppError,
    models::ride::{Booking, BookingStatus, Ride},
};

/// Booking lifecycle against a ride's seat capacity.
#[derive(Clone)]
pub struct BookingService {
    db: DbPool,
}

impl BookingService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Admits a booking against the ride's current capacity and persists it
    /// atomically. The seat decrement is a conditional update, so a
    /// concurrent booking that raced us past the snapshot check still cannot
    /// push available_seats below zero.
    pub async fn create(
        &self,
        ride_id: i64,
        passenger_id: i64,
        seats_booked: i64,
    ) -> Result<Booking, AppError> {
        let mut tx = self.db.begin().await?;

        let ride = sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = ?")
            .bind(ride_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound)?;

        availability::reserve_seats(ride.available_seats, seats_booked)?;

        let decremented = sqlx::query(
            "UPDATE rides SET available_seats = available_seats - ? WHERE id = ? AND available_seats >= ?",
        )
        .bind(seats_booked)
        .bind(ride_id)
        .bind(seats_booked)
        .execute(&mut *tx)
        .await?;
        if decremented.rows_affected() == 0 {
            warn!(ride_id, seats_booked, "lost seat race on booking");
            return Err(DomainError::InsufficientSeats {
                requested: seats_booked,
                available: ride.available_seats,
            }
            .into());
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (ride_id, passenger_id, seats_booked, status, booked_at)
               VALUES (?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(ride_id)
        .bind(passenger_id)
        .bind(seats_booked)
        .bind(BookingStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(booking)
    }

    pub async fn list(
        &self,
        passenger_id: Option<i64>,
        ride_id: Option<i64>,
    ) -> Result<Vec<Booking>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM bookings WHERE 1 = 1");
        if let Some(passenger_id) = passenger_id {
            qb.push(" AND passenger_id = ").push_bind(passenger_id);
        }
        if let Some(ride_id) = ride_id {
            qb.push(" AND ride_id = ").push_bind(ride_id);
        }
        qb.push(" ORDER BY booked_at DESC");

        let bookings = qb.build_query_as::<Booking>().fetch_all(&self.db).await?;
        Ok(bookings)
    }

    pub async fn get(&self, booking_id: i64) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Moves a booking through the status table. A transition into
    /// cancelled gives the seats back to the ride in the same transaction.
    pub async fn set_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut tx = self.db.begin().await?;

        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound)?;

        availability::transition(booking.status, status)?;

        if status == BookingStatus::Cancelled {
            let ride = sqlx::query_as::<_, Ride>("SELECT * FROM rides WHERE id = ?")
                .bind(booking.ride_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::NotFound)?;
            let restored = availability::release_seats(ride.available_seats, &booking)?;
            sqlx::query("UPDATE rides SET available_seats = ? WHERE id = ?")
                .bind(restored)
                .bind(ride.id)
                .execute(&mut *tx)
                .await?;
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ? WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Hard delete. Seats are not restored; cancel first to give capacity
    /// back.
    pub async fn delete(&self, booking_id: i64) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(booking_id)
            .execute(&self.db)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
