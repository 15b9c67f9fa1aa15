//! Configuration module for the study sheet backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
    /// Lifetime of issued bearer tokens
    pub token_ttl: Duration,
    /// Optional seed document normalized once at startup
    pub seed_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("STUDY_DB_PATH")
            .unwrap_or_else(|_| "./data/study.sqlite".to_string())
            .into();

        let bind_addr = env::var("STUDY_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:4000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid STUDY_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("STUDY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("STUDY_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

        let ttl_hours: i64 = env::var("STUDY_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid STUDY_TOKEN_TTL_HOURS: {}", e)))?;
        let token_ttl = Duration::try_hours(ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                AppError::Config("STUDY_TOKEN_TTL_HOURS must be a positive hour count".to_string())
            })?;

        let seed_path = env::var("STUDY_SEED_PATH").ok().map(PathBuf::from);

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_json,
            token_ttl,
            seed_path,
        })
    }
}
