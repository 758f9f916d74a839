//! Homework review records.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Review status reported by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single homework entry from the `homeworks` list.
///
/// Deserialization doubles as schema validation: every field is required and
/// must carry the declared type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Homework {
    /// Stable identity of the record
    pub id: i64,

    /// Name of the submitted work (usually the repository archive name)
    pub homework_name: String,

    /// Current review status
    pub status: HomeworkStatus,

    /// Timestamp of the last status change, as sent by the API
    pub date_updated: String,

    /// Lesson the work belongs to; numeric names are kept as their digits
    #[serde(deserialize_with = "text_or_number")]
    pub lesson_name: String,

    /// Free-form reviewer comment
    pub reviewer_comment: String,
}

impl Homework {
    /// Render the chat notification for the current status.
    pub fn status_message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

/// Accept a string or an integer and keep it as text.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(i64),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

/// Validated response of one status request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBatch {
    /// Server time to use as the next cursor
    pub current_date: i64,

    /// Entries that passed validation, in response order
    pub homeworks: Vec<Homework>,

    /// Number of entries dropped by validation
    pub rejected: usize,
}
