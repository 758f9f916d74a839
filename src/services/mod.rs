//! Service layer for the homework bot.
//!
//! This module contains the two external integrations:
//! - Homework review API (`PracticumClient`)
//! - Chat delivery (`TelegramClient`)

mod practicum;
mod telegram;

pub use practicum::{PracticumClient, ReviewApi, interpret_response};
pub use telegram::{Messenger, TelegramClient, interpret_reply};
