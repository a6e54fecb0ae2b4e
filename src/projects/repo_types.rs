use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub language: String,
}

/// A project as submitted by a client; `(name, author, language)` is its natural key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub author: String,
    pub language: String,
}
