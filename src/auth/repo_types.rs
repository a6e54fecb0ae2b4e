use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,                  // argon2 hash, not exposed in JSON
    pub email: String,
    pub created_on: OffsetDateTime,
    pub languages: Vec<String>,            // filled in by the store
    pub favorite_language: Option<String>,
    pub frequency: i32,
}
