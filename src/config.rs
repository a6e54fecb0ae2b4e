use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

/// Settings for the HTTP mail API used for welcome emails.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub mail: Option<MailConfig>,
    /// Bookmark endpoints check the bearer token subject against the path id.
    pub auth_required: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let port = required("PORT")?
            .trim()
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: match lookup("DB_PORT") {
                Some(v) => v
                    .trim()
                    .parse::<u16>()
                    .context("DB_PORT must be a valid port number")?,
                None => 5432,
            },
            user: required("DB_USER")?,
            password: required("DB_PASS")?,
            name: required("DB_NAME")?,
        };

        let ttl_minutes = match lookup("JWT_TTL_MINUTES") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|m| *m > 0)
                .context("JWT_TTL_MINUTES must be a positive number")?,
            None => 60 * 24,
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "devhub".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "devhub-users".into()),
            ttl_minutes,
        };

        let mail = match (lookup("MAIL_API_URL"), lookup("MAIL_API_KEY"), lookup("MAIL_FROM")) {
            (Some(api_url), Some(api_key), Some(from)) => Some(MailConfig {
                api_url,
                api_key,
                from,
            }),
            _ => None,
        };

        let auth_required = lookup("AUTH_REQUIRED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database,
            jwt,
            mail,
            auth_required,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
