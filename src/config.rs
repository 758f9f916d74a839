// src/config.rs

//! Configuration loading utilities.
//!
//! Settings come from a TOML file, secrets from the environment.

use std::fmt;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Secrets required to talk to both APIs.
#[derive(Clone)]
pub struct Credentials {
    /// OAuth token for the review API
    pub practicum_token: String,
    /// Telegram bot token
    pub telegram_token: String,
    /// Recipient chat identifier
    pub chat_id: String,
}

impl Credentials {
    /// Read credentials from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    ///
    /// Every missing or blank variable is logged before the error is returned.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => {
                log::error!("Token {} is not set", name);
                missing.push(name);
                String::new()
            }
        };

        let credentials = Self {
            practicum_token: read(PRACTICUM_TOKEN),
            telegram_token: read(TELEGRAM_TOKEN),
            chat_id: read(TELEGRAM_CHAT_ID),
        };

        if missing.is_empty() {
            Ok(credentials)
        } else {
            Err(AppError::config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Load and validate the config file and the credentials.
pub fn load_all(config_path: &Path) -> Result<(Config, Credentials)> {
    let config = Config::load_or_default(config_path);
    config.validate()?;

    let credentials = Credentials::from_env()?;
    Ok((config, credentials))
}
