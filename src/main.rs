mod app;
mod auth;
mod config;
mod db;
mod error;
mod mail;
mod projects;
mod state;
#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "devhub=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let addr = config.server_address();

    let pool = db::connect(&config.database).await?;
    if let Err(e) = db::apply_schema(&pool).await {
        tracing::warn!(error = %e, "schema migration failed; continuing");
    }

    let app_state = AppState::init(config, pool)?;
    app::serve(app::build_app(app_state), &addr).await
}
