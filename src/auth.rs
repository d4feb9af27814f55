use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};

use crate::{
    error::AppError,
    models::user::{User, UserRole},
    state::AppState,
};

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
}

pub async fn register_user(state: &AppState, new_user: NewUser) -> Result<User, AppError> {
    let username = new_user.username.trim().to_string();
    let email = new_user.email.trim().to_string();

    if username.is_empty() || email.is_empty() {
        return Err(AppError::BadRequest(
            "username and email must not be empty".into(),
        ));
    }
    if new_user.password.len() < 8 {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }

    let taken: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE username = ?1 OR email = ?2")
            .bind(&username)
            .bind(&email)
            .fetch_optional(&state.db)
            .await?;
    if taken.is_some() {
        return Err(AppError::BadRequest(
            "username or email is already registered".into(),
        ));
    }

    let password_hash = hash_password(&new_user.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"INSERT INTO users (username, email, password_hash, full_name, phone, role, eco_score, created_at)
           VALUES (?, ?, ?, ?, ?, ?, 0, ?)
           RETURNING *"#,
    )
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(&new_user.full_name)
    .bind(&new_user.phone)
    .bind(new_user.role)
    .bind(chrono::Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok(user)
}

/// Looks the user up by username or email and verifies the password.
pub async fn authenticate_user(
    state: &AppState,
    identifier: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?1 OR email = ?1")
        .bind(identifier.trim())
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if verify_password(password, &user.password_hash) {
        Ok(user)
    } else {
        Err(AppError::Unauthorized)
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Other(anyhow::anyhow!("password hashing failed: {err}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
