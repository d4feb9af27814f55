use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{self, NewUser},
    error::AppError,
    models::user::{UserProfile, UserRole},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Deserialize)]
struct RegisterPayload {
    username: String,
    email: String,
    password: String,
    full_name: Option<String>,
    phone: Option<String>,
    #[serde(default)]
    role: UserRole,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::register_user(
        &state,
        NewUser {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
            phone: payload.phone,
            role: payload.role,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": UserProfile::from(user),
        })),
    ))
}

#[derive(Deserialize)]
struct LoginPayload {
    /// Username or email.
    username: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::authenticate_user(&state, &payload.username, &payload.password).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "user": UserProfile::from(user),
    })))
}
