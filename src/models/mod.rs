pub mod carpool;
pub mod ride;
pub mod trip;
pub mod user;
