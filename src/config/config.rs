use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use once_cell::sync::Lazy;
use serde::Deserialize;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("Failed to load config: {}", e)));

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub quiz: QuizConfig,
    pub pagination: PaginationConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub token_expiry_buffer_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizConfig {
    /// Used when neither navigation state nor the server supply a duration.
    pub default_duration_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
}

impl AppConfig {
    /// Defaults, then `lms.toml` if present, then `LMS__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();

        Config::builder()
            .set_default("api.base_url", "https://api.lms.itechacademy.uz/api")?
            .set_default("api.timeout_ms", 10_000)?
            .set_default("auth.token_expiry_buffer_secs", 300)?
            .set_default("quiz.default_duration_minutes", 30)?
            .set_default("pagination.page_size", 10)?
            .set_default("log.level", "warn")?
            .add_source(File::with_name("lms").required(false))
            .add_source(Environment::with_prefix("LMS").separator("__"))
            .build()?
            .try_deserialize()
    }
}
