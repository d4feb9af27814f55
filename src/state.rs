use crate::{
    config::AppConfig,
    db::DbPool,
    services::{bookings::BookingService, trips::TripService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub trips: TripService,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let trips = TripService::new(db.clone());
        let bookings = BookingService::new(db.clone());
        Self {
            config,
            db,
            trips,
            bookings,
        }
    }
}
