use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewProject, Project};
use crate::error::RepoError;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Id of the project with this natural key, `NotFound` otherwise.
    async fn project_exists(
        &self,
        name: &str,
        author: &str,
        language: &str,
    ) -> Result<i32, RepoError>;

    async fn add_project(&self, project: &NewProject) -> Result<i32, RepoError>;

    /// Idempotent: bookmarking twice returns the original bookmark id.
    async fn bookmark_project(&self, user_id: i32, project_id: i32) -> Result<i32, RepoError>;

    async fn fetch_bookmarked_projects(&self, user_id: i32) -> Result<Vec<Project>, RepoError>;
}

#[derive(Clone)]
pub struct PgProjectRepository {
    db: PgPool,
}

impl PgProjectRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn project_exists(
        &self,
        name: &str,
        author: &str,
        language: &str,
    ) -> Result<i32, RepoError> {
        sqlx::query_scalar::<_, i32>(
            r#"
            SELECT id
              FROM projects
             WHERE name = $1 AND author = $2 AND language = $3
            "#,
        )
        .bind(name)
        .bind(author)
        .bind(language)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn add_project(&self, project: &NewProject) -> Result<i32, RepoError> {
        // A racing insert of the same triple resolves to the row that won.
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO projects (name, author, language)
            VALUES ($1, $2, $3)
            ON CONFLICT (name, author, language)
            DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(&project.author)
        .bind(&project.language)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn bookmark_project(&self, user_id: i32, project_id: i32) -> Result<i32, RepoError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO bookmarked_projects (user_id, project_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, project_id)
            DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn fetch_bookmarked_projects(&self, user_id: i32) -> Result<Vec<Project>, RepoError> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.author, p.language
              FROM bookmarked_projects b
              JOIN projects p ON p.id = b.project_id
             WHERE b.user_id = $1
             ORDER BY b.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
