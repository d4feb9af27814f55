pub mod bookings;
pub mod trips;
