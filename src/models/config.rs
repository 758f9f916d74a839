//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Review API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling loop settings
    #[serde(default)]
    pub poll: PollConfig,

    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        validate_http_url("api.endpoint", &self.api.endpoint)?;
        validate_http_url("telegram.api_base", &self.telegram.api_base)?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.poll.interval_secs == 0 {
            return Err(AppError::validation("poll.interval_secs must be > 0"));
        }
        if let Some(from_date) = self.poll.initial_from_date {
            if from_date < 0 {
                return Err(AppError::validation(
                    "poll.initial_from_date must not be negative",
                ));
            }
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(AppError::validation(format!(
                "logging.level '{}' is not one of off/error/warn/info/debug/trace",
                self.logging.level
            )));
        }
        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| AppError::validation(format!("{field} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::validation(format!(
            "{field} must use http or https, got '{other}'"
        ))),
    }
}

/// Review API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Homework statuses endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Fixed delay between cycles in seconds
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Starting cursor; the current time is used when unset
    #[serde(default)]
    pub initial_from_date: Option<i64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            initial_from_date: None,
        }
    }
}

/// Telegram delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,

    /// Also send failed-cycle reports to the chat
    #[serde(default = "defaults::report_errors")]
    pub report_errors: bool,

    /// Parse mode used for error reports
    #[serde(default = "defaults::parse_mode")]
    pub parse_mode: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::telegram_api_base(),
            report_errors: defaults::report_errors(),
            parse_mode: defaults::parse_mode(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    pub fn endpoint() -> String {
        "https://practicum.yandex.ru/api/user_api/homework_statuses/".into()
    }
    pub fn user_agent() -> String {
        concat!("homework-bot/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn interval() -> u64 {
        600
    }
    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn report_errors() -> bool {
        true
    }
    pub fn parse_mode() -> String {
        "HTML".into()
    }
    pub fn level() -> String {
        "info".into()
    }
}
