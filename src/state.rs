use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserRepository, UserRepository};
use crate::config::AppConfig;
use crate::mail::{HttpMailer, LogMailer, Mailer};
use crate::projects::repo::{PgProjectRepository, ProjectRepository};

/// Everything a handler needs, injected through `Router::with_state`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn init(config: AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let mailer = match config.mail.clone() {
            Some(mail) => Arc::new(HttpMailer::new(mail)?) as Arc<dyn Mailer>,
            None => {
                tracing::warn!("MAIL_API_URL/MAIL_API_KEY/MAIL_FROM not set; welcome emails disabled");
                Arc::new(LogMailer) as Arc<dyn Mailer>
            }
        };

        Ok(Self::from_parts(
            Arc::new(config),
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgProjectRepository::new(db)),
            mailer,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            users,
            projects,
            mailer,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by in-memory stores and a recording mailer.
    pub fn fake() -> Self {
        crate::testing::Harness::new().state
    }
}
