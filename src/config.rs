// src/config.rs

use std::{env, path::PathBuf};

use dotenvy::dotenv;

/// Number of answer options every stored question carries.
pub const OPTION_COUNT: usize = 6;

/// Filler used when an imported question has fewer than `OPTION_COUNT` options.
pub const OPTION_PLACEHOLDER: &str = "n/a";

/// Stem used when an imported question has none.
pub const STEM_PLACEHOLDER: &str = "Untitled question";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub session_dir: PathBuf,
    pub bind_addr: String,
    pub static_dir: Option<PathBuf>,
    pub log_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("QCM_DATABASE_URL").unwrap_or_else(|_| "sqlite://qcm.db".to_string());

        let max_connections = env::var("QCM_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let session_dir = env::var("QCM_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("sessions"));

        let bind_addr = env::var("QCM_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        let static_dir = env::var("QCM_STATIC_DIR").ok().map(PathBuf::from);

        let log_dir = env::var("QCM_LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            max_connections,
            session_dir,
            bind_addr,
            static_dir,
            log_dir,
            rust_log,
        }
    }
}
