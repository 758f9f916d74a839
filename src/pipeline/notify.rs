// src/pipeline/notify.rs

//! Notification dispatch.

use crate::error::AppError;
use crate::models::{Homework, TelegramConfig};
use crate::services::Messenger;

use super::diff::SeenStatuses;

/// Counts for one dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyOutcome {
    pub sent: usize,
    pub failed: usize,
}

/// Send a status message for every changed homework.
///
/// A homework is recorded as seen only after its message went out, so a
/// failed send is attempted again if the record shows up in a later response.
pub async fn notify_changes(
    messenger: &dyn Messenger,
    seen: &mut SeenStatuses,
    homeworks: &[Homework],
) -> NotifyOutcome {
    let mut outcome = NotifyOutcome::default();

    for homework in seen.changed(homeworks) {
        log::info!(
            "{} status is changed! New status is '{}', updated at {}",
            homework.homework_name,
            homework.status,
            homework.date_updated
        );

        match messenger.send(&homework.status_message(), None).await {
            Ok(()) => {
                seen.record(homework);
                outcome.sent += 1;
            }
            Err(e) => {
                outcome.failed += 1;
                log::error!("Sending message error: {}", e);
            }
        }
    }

    if outcome.sent == 0 && outcome.failed == 0 {
        log::debug!("No homework status changes");
    }
    outcome
}

/// Forwards failed-cycle errors to the chat.
///
/// The same error text is sent once until a successful cycle re-arms it.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    enabled: bool,
    parse_mode: String,
    last_reported: Option<String>,
}

impl ErrorReporter {
    /// Create a reporter from the Telegram settings.
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            enabled: config.report_errors,
            parse_mode: config.parse_mode.clone(),
            last_reported: None,
        }
    }

    /// Report `error` unless it repeats the previous report.
    ///
    /// Returns whether a message was sent.
    pub async fn report(&mut self, messenger: &dyn Messenger, error: &AppError) -> bool {
        if !self.enabled {
            return false;
        }

        let text = error.to_string();
        if self.last_reported.as_deref() == Some(text.as_str()) {
            log::debug!("Error already reported, skipping: {}", text);
            return false;
        }

        let parse_mode = (!self.parse_mode.is_empty()).then_some(self.parse_mode.as_str());
        let message = render_error_report(&text, parse_mode);

        match messenger.send(&message, parse_mode).await {
            Ok(()) => {
                self.last_reported = Some(text);
                true
            }
            Err(e) => {
                log::error!("Log to telegram error: {}", e);
                false
            }
        }
    }

    /// Forget the last report after a healthy cycle.
    pub fn reset(&mut self) {
        self.last_reported = None;
    }
}

/// Render an error report, highlighting the level when HTML is in use.
pub fn render_error_report(text: &str, parse_mode: Option<&str>) -> String {
    match parse_mode {
        Some(mode) if mode.eq_ignore_ascii_case("html") => {
            format!("<u><b>ERROR</b></u> {}", html_escape::encode_text(text))
        }
        _ => format!("ERROR {}", text),
    }
}
