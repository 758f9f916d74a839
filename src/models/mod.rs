// src/models/mod.rs

//! Domain models for the homework bot.

mod config;
mod homework;

// Re-export all public types
pub use config::{ApiConfig, Config, LoggingConfig, PollConfig, TelegramConfig};
pub use homework::{Homework, HomeworkStatus, StatusBatch};
