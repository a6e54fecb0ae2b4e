use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, SignUpRequest},
        jwt::JwtKeys,
        password::hash_password,
    },
    error::{ApiError, RepoError},
    mail::spawn_welcome,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(sign_up))
        .route("/users/login", post(login))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Json(mut payload) = payload.map_err(|e| {
        warn!(error = %e, "malformed sign up body");
        ApiError::InvalidBody
    })?;
    payload.username = payload.username.trim().to_owned();
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.is_empty() || payload.password.is_empty() {
        warn!("sign up with empty username or password");
        return Err(ApiError::InvalidBody);
    }
    if !is_valid_email(&payload.email) {
        warn!("sign up with invalid email");
        return Err(ApiError::InvalidBody);
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "error hashing password");
        ApiError::PasswordHash
    })?;

    let user_id = state
        .users
        .create_user(&payload.username, &hash, &payload.email)
        .await
        .map_err(|e| {
            error!(error = %e, username = %payload.username, "create user failed");
            ApiError::UserCreate
        })?;

    info!(user_id, username = %payload.username, "new user registered");
    spawn_welcome(state.mailer.clone(), payload.username, payload.email);

    Ok(Json("OK"))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "malformed login body");
        ApiError::InvalidBody
    })?;

    let user = match state
        .users
        .confirm_user(payload.username.trim(), &payload.password)
        .await
    {
        Ok(u) => u,
        Err(RepoError::CredentialMismatch | RepoError::NotFound) => {
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "user lookup failed");
            return Err(ApiError::UserLookup);
        }
    };

    let token = JwtKeys::from_ref(&state)
        .sign(user.id, &user.username)
        .map_err(|e| {
            error!(error = %e, "jwt sign failed");
            ApiError::TokenIssue
        })?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
