pub mod auth;
pub mod bookings;
pub mod carpools;
pub mod rides;
pub mod trips;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/trips", trips::router())
        .nest("/api/rides", rides::router())
        .nest("/api/bookings", bookings::router())
        .nest("/api/carpools", carpools::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
