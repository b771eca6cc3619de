use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub frontend_url: String,
    pub host: String,
    pub port: u16,
    pub project_name: String,
    pub version: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => compose_database_url(
                &std::env::var("POSTGRES_USER").context("DATABASE_URL or POSTGRES_USER must be set")?,
                &std::env::var("POSTGRES_PASSWORD").context("POSTGRES_PASSWORD must be set")?,
                &std::env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".into()),
                env_parsed("POSTGRES_PORT", 5432),
                &std::env::var("POSTGRES_DB").context("POSTGRES_DB must be set")?,
            ),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "flashcards".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "flashcards-users".into()),
            ttl_minutes: env_parsed("ACCESS_TOKEN_EXPIRE_MINUTES", 60 * 24),
        };
        Ok(Self {
            database_url,
            max_connections: env_parsed("DATABASE_MAX_CONNECTIONS", 10),
            jwt,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parsed("APP_PORT", 8080),
            project_name: std::env::var("PROJECT_NAME").unwrap_or_else(|_| "Flashcards API".into()),
            version: env!("CARGO_PKG_VERSION").into(),
        })
    }

    /// Origins allowed by CORS: the configured frontend plus the alternate dev port.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.clone()];
        let alt = "http://localhost:3000".to_string();
        if !origins.contains(&alt) {
            origins.push(alt);
        }
        origins
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn compose_database_url(
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    db: &str,
) -> String {
    format!("postgres://{user}:{password}@{host}:{port}/{db}")
}
