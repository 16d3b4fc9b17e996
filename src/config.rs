use anyhow::Context;

pub const DEFAULT_MAX_LIMIT: i64 = 100;

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Shared secret for session tokens. Without it no caller is ever identified.
    pub session_secret: Option<String>,
    /// Upper bound applied to the caller-supplied `limit`.
    pub max_limit: i64,
    pub debug_mode: bool,
    pub allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        let max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v.parse::<u32>().context("DB_MAX_CONNECTIONS must be a valid number")?,
            Err(_) => 32,
        };

        let max_limit = match std::env::var("SEARCH_MAX_LIMIT") {
            Ok(v) => v
                .parse::<i64>()
                .ok()
                .filter(|&l| l > 0)
                .context("SEARCH_MAX_LIMIT must be a positive number")?,
            Err(_) => DEFAULT_MAX_LIMIT,
        };

        let session_secret = std::env::var("NEXTAUTH_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            session_secret,
            max_limit,
            debug_mode: std::env::var("DEBUG_MODE").unwrap_or_default() == "true",
            allowed_origins: std::env::var("ALLOWED_ORIGINS").ok(),
        })
    }
}
