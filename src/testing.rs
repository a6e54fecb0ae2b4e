//! In-memory stand-ins for the Postgres repositories and the mail API.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    auth::{repo::UserRepository, repo_types::User},
    config::{AppConfig, DatabaseConfig, JwtConfig},
    error::RepoError,
    mail::Mailer,
    projects::{
        repo::ProjectRepository,
        repo_types::{NewProject, Project},
    },
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        database: DatabaseConfig {
            host: "localhost".into(),
            port: 5432,
            user: "devhub".into(),
            password: "devhub".into(),
            name: "devhub".into(),
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 60 * 24,
        },
        mail: None,
        auth_required: false,
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
    calls: AtomicUsize,
}

impl MemoryUsers {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self, username: &str) -> Option<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|u| u.username == username).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<i32, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.username == username) {
            return Err(RepoError::ConstraintViolation("users_username_key".into()));
        }
        let id = rows.len() as i32 + 1;
        rows.push(User {
            id,
            username: username.into(),
            password: password_hash.into(),
            email: email.into(),
            created_on: OffsetDateTime::now_utc(),
            languages: Vec::new(),
            favorite_language: None,
            frequency: 0,
        });
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stored(username))
    }
}

#[derive(Default)]
struct ProjectRows {
    projects: Vec<Project>,
    bookmarks: Vec<(i32, i32, i32)>, // (id, user_id, project_id)
}

#[derive(Default)]
pub struct MemoryProjects {
    rows: Mutex<ProjectRows>,
    calls: AtomicUsize,
    pub fail_inserts: AtomicBool,
    pub fail_bookmarks: AtomicBool,
}

impl MemoryProjects {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn project_count(&self) -> usize {
        self.rows.lock().unwrap().projects.len()
    }

    pub fn bookmark_count(&self) -> usize {
        self.rows.lock().unwrap().bookmarks.len()
    }

    fn storage_error() -> RepoError {
        RepoError::Storage(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjects {
    async fn project_exists(
        &self,
        name: &str,
        author: &str,
        language: &str,
    ) -> Result<i32, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        rows.projects
            .iter()
            .find(|p| p.name == name && p.author == author && p.language == language)
            .map(|p| p.id)
            .ok_or(RepoError::NotFound)
    }

    async fn add_project(&self, project: &NewProject) -> Result<i32, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Self::storage_error());
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some(p) = rows.projects.iter().find(|p| {
            p.name == project.name && p.author == project.author && p.language == project.language
        }) {
            return Ok(p.id);
        }
        let id = rows.projects.len() as i32 + 1;
        rows.projects.push(Project {
            id,
            name: project.name.clone(),
            author: project.author.clone(),
            language: project.language.clone(),
        });
        Ok(id)
    }

    async fn bookmark_project(&self, user_id: i32, project_id: i32) -> Result<i32, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_bookmarks.load(Ordering::SeqCst) {
            return Err(Self::storage_error());
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some((id, _, _)) = rows
            .bookmarks
            .iter()
            .find(|(_, u, p)| *u == user_id && *p == project_id)
        {
            return Ok(*id);
        }
        let id = rows.bookmarks.len() as i32 + 1;
        rows.bookmarks.push((id, user_id, project_id));
        Ok(id)
    }

    async fn fetch_bookmarked_projects(&self, user_id: i32) -> Result<Vec<Project>, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .bookmarks
            .iter()
            .filter(|(_, u, _)| *u == user_id)
            .filter_map(|(_, _, pid)| rows.projects.iter().find(|p| p.id == *pid).cloned())
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_welcome(&self, username: &str, email: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((username.to_owned(), email.to_owned()));
        if self.fail {
            anyhow::bail!("mail api unavailable");
        }
        Ok(())
    }
}

/// Test state plus concrete handles on its fakes.
pub struct Harness {
    pub state: AppState,
    pub users: Arc<MemoryUsers>,
    pub projects: Arc<MemoryProjects>,
    pub mailer: Arc<RecordingMailer>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(test_config(), RecordingMailer::default())
    }

    pub fn with_auth_required() -> Self {
        let mut cfg = test_config();
        cfg.auth_required = true;
        Self::build(cfg, RecordingMailer::default())
    }

    pub fn with_failing_mailer() -> Self {
        Self::build(test_config(), RecordingMailer::failing())
    }

    fn build(config: AppConfig, mailer: RecordingMailer) -> Self {
        let users = Arc::new(MemoryUsers::default());
        let projects = Arc::new(MemoryProjects::default());
        let mailer = Arc::new(mailer);
        let state = AppState::from_parts(
            Arc::new(config),
            users.clone(),
            projects.clone(),
            mailer.clone(),
        );
        Self {
            state,
            users,
            projects,
            mailer,
        }
    }
}
