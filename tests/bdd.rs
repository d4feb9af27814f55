#![allow(dead_code)]

use std::{collections::HashMap, fmt, fs::File, net::SocketAddr};

use anyhow::Context;
use chrono::Utc;
use cucumber::{given, then, when, World as _};
use ecoride::{
    auth::{self, NewUser},
    config::AppConfig,
    db::init_pool,
    domain::DomainError,
    error::AppError,
    models::{
        ride::{Booking, BookingStatus},
        trip::TransportMode,
        user::UserRole,
    },
    services::trips::LoggedTrip,
    state::AppState,
};
use tempfile::TempDir;

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    users: HashMap<String, i64>,
    last_trip: Option<LoggedTrip>,
    ride_id: Option<i64>,
    booking: Option<Booking>,
    booking_error: Option<AppError>,
}

impl AppWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }

    fn user_id(&self, name: &str) -> i64 {
        *self
            .users
            .get(name)
            .unwrap_or_else(|| panic!("user {name} must be registered first"))
    }

    fn current_ride(&self) -> i64 {
        self.ride_id.expect("a ride must be offered first")
    }

    fn current_booking(&self) -> &Booking {
        self.booking.as_ref().expect("a booking must exist first")
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;

        let db_path = root.path().join("bdd.sqlite");
        File::create(&db_path)?;
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url: database_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        };

        let db = init_pool(&config.database_url).await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        let app = AppState::new(config, db);
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }
}

fn parse_mode(raw: &str) -> TransportMode {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .expect("transport mode deserializes")
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.users.clear();
    world.last_trip = None;
    world.ride_id = None;
    world.booking = None;
    world.booking_error = None;
}

#[given(
    regex = r#"^a registered (driver|passenger) "([^"]+)" with email "([^"]+)" and password "([^"]+)"$"#
)]
async fn given_registered_user(
    world: &mut AppWorld,
    role: String,
    username: String,
    email: String,
    password: String,
) {
    let role = if role == "driver" {
        UserRole::Driver
    } else {
        UserRole::Passenger
    };
    let user = auth::register_user(
        world.app_state(),
        NewUser {
            username: username.clone(),
            email,
            password,
            full_name: None,
            phone: None,
            role,
        },
    )
    .await
    .expect("register user");
    world.users.insert(username, user.id);
}

#[when(regex = r#"^"([^"]+)" logs a "([^"]+)" trip of ([\d.]+) km$"#)]
async fn when_log_trip(world: &mut AppWorld, username: String, mode: String, distance: f64) {
    let user_id = world.user_id(&username);
    let logged = world
        .app_state()
        .trips
        .log_trip(user_id, parse_mode(&mode), distance, None)
        .await
        .expect("log trip");
    world.last_trip = Some(logged);
}

#[then(regex = r"^the trip response reports ([\d.]+) kg CO2 saved and ([\d.]+) eco points$")]
async fn then_trip_scores(world: &mut AppWorld, co2: f64, points: f64) {
    let logged = world.last_trip.as_ref().expect("a trip must be logged");
    assert!((logged.score.co2_saved_kg - co2).abs() < 1e-9);
    assert!((logged.score.eco_points - points).abs() < 1e-9);
}

#[then(regex = r#"^the eco score of "([^"]+)" is ([\d.]+)$"#)]
async fn then_eco_score(world: &mut AppWorld, username: String, expected: f64) {
    let user_id = world.user_id(&username);
    let score: f64 = sqlx::query_scalar("SELECT eco_score FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&world.app_state().db)
        .await
        .expect("fetch eco score");
    assert!((score - expected).abs() < 1e-9);
}

#[then(regex = r#"^the weekly breakdown for "([^"]+)" lists (\d+) modes$"#)]
async fn then_weekly_modes(world: &mut AppWorld, username: String, expected: usize) {
    let user_id = world.user_id(&username);
    let report = world
        .app_state()
        .trips
        .analytics(user_id, Utc::now().date_naive())
        .await
        .expect("analytics");
    assert_eq!(report.weekly_analytics.len(), expected);
}

#[then(regex = r#"^the lifetime totals for "([^"]+)" count (\d+) trips and ([\d.]+) km$"#)]
async fn then_lifetime_totals(world: &mut AppWorld, username: String, trips: u64, distance: f64) {
    let user_id = world.user_id(&username);
    let report = world
        .app_state()
        .trips
        .analytics(user_id, Utc::now().date_naive())
        .await
        .expect("analytics");
    assert_eq!(report.total_stats.total_trips, trips);
    assert!((report.total_stats.total_distance - distance).abs() < 1e-9);
}

#[given(regex = r#"^"([^"]+)" offers a ride from "([^"]+)" to "([^"]+)" with (\d+) seats$"#)]
async fn given_ride(world: &mut AppWorld, driver: String, from: String, to: String, seats: i64) {
    let driver_id = world.user_id(&driver);
    let ride_id = sqlx::query(
        r#"INSERT INTO rides (driver_id, start_location, end_location, departure_time, available_seats, created_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(driver_id)
    .bind(from)
    .bind(to)
    .bind(Utc::now())
    .bind(seats)
    .bind(Utc::now())
    .execute(&world.app_state().db)
    .await
    .expect("insert ride")
    .last_insert_rowid();
    world.ride_id = Some(ride_id);
}

#[when(regex = r#"^"([^"]+)" books (-?\d+) seats on that ride$"#)]
async fn when_books(world: &mut AppWorld, passenger: String, seats: i64) {
    let passenger_id = world.user_id(&passenger);
    let ride_id = world.current_ride();
    match world
        .app_state()
        .bookings
        .create(ride_id, passenger_id, seats)
        .await
    {
        Ok(booking) => {
            world.booking = Some(booking);
            world.booking_error = None;
        }
        Err(err) => {
            world.booking = None;
            world.booking_error = Some(err);
        }
    }
}

#[then("the booking is pending")]
async fn then_booking_pending(world: &mut AppWorld) {
    assert_eq!(world.current_booking().status, BookingStatus::Pending);
}

#[then(regex = r"^the ride has (\d+) seats left$")]
async fn then_seats_left(world: &mut AppWorld, expected: i64) {
    let ride_id = world.current_ride();
    let seats: i64 = sqlx::query_scalar("SELECT available_seats FROM rides WHERE id = ?")
        .bind(ride_id)
        .fetch_one(&world.app_state().db)
        .await
        .expect("fetch seats");
    assert_eq!(seats, expected);
}

#[then("the booking is rejected for insufficient seats")]
async fn then_rejected_insufficient(world: &mut AppWorld) {
    assert!(matches!(
        world.booking_error,
        Some(AppError::Domain(DomainError::InsufficientSeats { .. }))
    ));
}

#[then("the booking is rejected as invalid")]
async fn then_rejected_invalid(world: &mut AppWorld) {
    assert!(matches!(
        world.booking_error,
        Some(AppError::Domain(DomainError::InvalidRequest(_)))
    ));
}

#[when("the booking is confirmed")]
async fn when_booking_confirmed(world: &mut AppWorld) {
    let id = world.current_booking().id;
    let updated = world
        .app_state()
        .bookings
        .set_status(id, BookingStatus::Confirmed)
        .await
        .expect("confirm booking");
    world.booking = Some(updated);
}

#[when("the booking is cancelled")]
async fn when_booking_cancelled(world: &mut AppWorld) {
    let id = world.current_booking().id;
    let updated = world
        .app_state()
        .bookings
        .set_status(id, BookingStatus::Cancelled)
        .await
        .expect("cancel booking");
    world.booking = Some(updated);
}

#[then("cancelling the booking again fails as an invalid transition")]
async fn then_recancel_fails(world: &mut AppWorld) {
    let id = world.current_booking().id;
    let err = world
        .app_state()
        .bookings
        .set_status(id, BookingStatus::Cancelled)
        .await
        .expect_err("re-cancel must fail");
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidTransition { .. })
    ));
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
