use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;

/// Request body for sign up.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Request body for sign in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub languages: Vec<String>,
    pub favorite_language: Option<String>,
    pub frequency: i32,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            languages: u.languages,
            favorite_language: u.favorite_language,
            frequency: u.frequency,
        }
    }
}
