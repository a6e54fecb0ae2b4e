use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, warn};

use crate::{
    auth::{password::verify_password, repo_types::User},
    error::RepoError,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the generated id.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<i32, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Look up `username` and check `password` against the stored hash.
    ///
    /// Unknown users and wrong passwords both yield `CredentialMismatch`.
    async fn confirm_user(&self, username: &str, password: &str) -> Result<User, RepoError> {
        let Some(user) = self.find_by_username(username).await? else {
            warn!("login for unknown username");
            return Err(RepoError::CredentialMismatch);
        };
        match verify_password(password, &user.password) {
            Ok(true) => Ok(user),
            Ok(false) => {
                warn!(user_id = user.id, "login with wrong password");
                Err(RepoError::CredentialMismatch)
            }
            Err(e) => {
                error!(error = %e, user_id = user.id, "stored password hash is unreadable");
                Err(RepoError::CredentialMismatch)
            }
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<i32, RepoError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (username, password, email, created_on)
            VALUES ($1, $2, $3, now())
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, created_on,
                   languages, favorite_language, frequency
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
