use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced to API clients.
///
/// Every variant has a fixed numeric code that clients can match on; the
/// message is deliberately generic and internal details stay in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Bad request!")]
    InvalidBody,
    #[error("Server error")]
    PasswordHash,
    #[error("Failed to create user")]
    UserCreate,
    #[error("Login credentials are not correct")]
    InvalidCredentials,
    #[error("Bad request!")]
    InvalidUserId,
    #[error("Failed to add new project")]
    ProjectCreate,
    #[error("Failed to bookmark project")]
    BookmarkNewProject,
    #[error("Failed to bookmark project")]
    BookmarkExistingProject,
    #[error("Failed to fetch bookmarked projects")]
    BookmarkFetch,
    #[error("Server error")]
    TokenIssue,
    #[error("Missing or invalid token")]
    Unauthorized,
    #[error("Token does not grant access to this user")]
    Forbidden,
    #[error("Server error")]
    UserLookup,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn code(self) -> u16 {
        match self {
            ApiError::InvalidBody => 1,
            ApiError::PasswordHash => 2,
            ApiError::UserCreate => 3,
            ApiError::InvalidCredentials => 4,
            ApiError::InvalidUserId => 5,
            ApiError::ProjectCreate => 6,
            ApiError::BookmarkNewProject => 7,
            ApiError::BookmarkExistingProject => 8,
            ApiError::BookmarkFetch => 9,
            ApiError::TokenIssue => 10,
            ApiError::Unauthorized => 11,
            ApiError::Forbidden => 12,
            ApiError::UserLookup => 13,
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::InvalidUserId => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PasswordHash
            | ApiError::UserCreate
            | ApiError::ProjectCreate
            | ApiError::BookmarkNewProject
            | ApiError::BookmarkExistingProject
            | ApiError::BookmarkFetch
            | ApiError::TokenIssue
            | ApiError::UserLookup => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Errors raised by the repositories.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,
    #[error("credentials do not match")]
    CredentialMismatch,
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("storage error: {0}")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if crate::db::is_constraint_violation(&err) {
            RepoError::ConstraintViolation(err.to_string())
        } else {
            RepoError::Storage(err)
        }
    }
}
