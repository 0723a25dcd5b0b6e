use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,
    /// Browser origins allowed to call the API
    pub cors_origins: Vec<String>,

    // Logging
    pub log_dir: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let server_addr = match lookup("SERVER_ADDR") {
            Some(addr) => addr,
            None => {
                let port = lookup("APP_PORT").unwrap_or_else(|| "8080".to_string());
                format!("0.0.0.0:{}", port)
            }
        };

        let log_level = lookup("LOG_LEVEL")
            .unwrap_or_else(|| "debug".to_string())
            .parse::<Level>()
            .context("LOG_LEVEL must be one of trace, debug, info, warn, error")?;

        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            server_addr,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            cors_origins,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level,
        })
    }
}
