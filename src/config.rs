// src/config.rs

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use dotenvy::dotenv;

use crate::error::AppError;

/// Default bound of the history ledger.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Default number of entries returned by `GET /history`.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub questions_path: PathBuf,
    pub history_capacity: usize,
    pub rust_log: String,
    pub log_dir: String,
    /// Base URL of a running server, used by the terminal client only.
    pub api_url: Option<String>,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3000".to_string(),
            questions_path: PathBuf::from("data/questions.json"),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            api_url: None,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let defaults = Self::default();

        let history_capacity = env_parse("HISTORY_CAPACITY", defaults.history_capacity)?;
        if history_capacity == 0 {
            return Err(AppError::Config(
                "HISTORY_CAPACITY must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            server_address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            questions_path: env::var("QUESTIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.questions_path),
            history_capacity,
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            api_url: env::var("QUIZ_API_URL").ok().filter(|url| !url.is_empty()),
            fetch_timeout: Duration::from_secs(env_parse(
                "FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )?),
        })
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
