// src/pipeline/poll.rs

//! Polling loop driver.
//!
//! Owns the cursor and the previously-seen map. One cycle is
//! fetch → validate → diff → notify; the loop repeats cycles forever at a
//! fixed interval and never stops on a cycle error.

use std::time::Duration;

use crate::error::Result;
use crate::models::Config;
use crate::services::{Messenger, ReviewApi};
use crate::utils::{format_timestamp, now_timestamp};

use super::diff::SeenStatuses;
use super::notify::{ErrorReporter, notify_changes};
use super::validate::check_response;

/// Summary of one successful cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Valid records in the response
    pub received: usize,
    /// Records dropped by validation
    pub rejected: usize,
    /// Notifications delivered
    pub sent: usize,
    /// Notifications that failed to send
    pub failed: usize,
    /// Cursor after the cycle
    pub cursor: i64,
}

/// Status poller with its in-memory state.
pub struct Poller<'a> {
    api: &'a dyn ReviewApi,
    messenger: &'a dyn Messenger,
    interval: Duration,
    cursor: i64,
    seen: SeenStatuses,
    reporter: ErrorReporter,
}

impl<'a> Poller<'a> {
    /// Create a poller; the cursor starts at `poll.initial_from_date` or now.
    pub fn new(api: &'a dyn ReviewApi, messenger: &'a dyn Messenger, config: &Config) -> Self {
        Self {
            api,
            messenger,
            interval: Duration::from_secs(config.poll.interval_secs),
            cursor: config.poll.initial_from_date.unwrap_or_else(now_timestamp),
            seen: SeenStatuses::new(),
            reporter: ErrorReporter::new(&config.telegram),
        }
    }

    /// Override the starting cursor.
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    /// Current cursor.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Previously-seen map.
    pub fn seen(&self) -> &SeenStatuses {
        &self.seen
    }

    /// Run one cycle. The cursor only moves when the whole cycle succeeds.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let response = self.api.homework_statuses(self.cursor).await?;
        let batch = check_response(&response)?;
        let outcome = notify_changes(self.messenger, &mut self.seen, &batch.homeworks).await;

        self.cursor = batch.current_date;
        log::debug!(
            "Cursor advanced to {} ({})",
            self.cursor,
            format_timestamp(self.cursor)
        );

        Ok(CycleReport {
            received: batch.homeworks.len(),
            rejected: batch.rejected,
            sent: outcome.sent,
            failed: outcome.failed,
            cursor: self.cursor,
        })
    }

    /// Run one cycle, logging and reporting a failure instead of propagating it.
    pub async fn tick(&mut self) -> Option<CycleReport> {
        match self.run_cycle().await {
            Ok(report) => {
                self.reporter.reset();
                Some(report)
            }
            Err(e) => {
                log::error!("Failed to retrieve homework status data: {}", e);
                self.reporter.report(self.messenger, &e).await;
                None
            }
        }
    }

    /// Poll forever with a fixed delay between cycles.
    pub async fn run_forever(&mut self) {
        log::info!(
            "Starting to check the status of homework every {}s from {}",
            self.interval.as_secs(),
            format_timestamp(self.cursor)
        );

        loop {
            if let Some(report) = self.tick().await {
                log::info!(
                    "Cycle done: {} received, {} rejected, {} sent, {} failed",
                    report.received,
                    report.rejected,
                    report.sent,
                    report.failed
                );
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::error::AppError;
    use crate::models::Homework;
    use crate::services::fakes::{FakeMessenger, FakeReviewApi};
    use crate::services::interpret_response;

    const START: i64 = 1_000;

    fn config() -> Config {
        let mut config = Config::default();
        config.poll.initial_from_date = Some(START);
        config
    }

    fn entry(id: i64, status: &str, updated: &str) -> Value {
        json!({
            "id": id,
            "homework_name": format!("hw_{id}.zip"),
            "status": status,
            "date_updated": updated,
            "lesson_name": "Lesson",
            "reviewer_comment": "ok",
        })
    }

    fn response(current_date: i64, homeworks: Vec<Value>) -> Value {
        json!({ "current_date": current_date, "homeworks": homeworks })
    }

    #[tokio::test]
    async fn test_only_valid_entries_are_notified() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(Ok(response(
            2_000,
            vec![
                entry(1, "approved", "t1"),
                json!({"id": 2, "status": "approved"}),
                entry(3, "rejected", "t1"),
            ],
        )));

        let config = config();
        let mut poller = Poller::new(&api, &messenger, &config);
        let report = poller.run_cycle().await.unwrap();

        assert_eq!(report.received, 2);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.sent, 2);
        let texts = messenger.texts();
        assert!(texts[0].contains("hw_1.zip"));
        assert!(texts[1].contains("hw_3.zip"));
    }

    #[tokio::test]
    async fn test_cursor_advances_and_is_sent_next_cycle() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(Ok(response(2_000, vec![])));
        api.push(Ok(response(3_000, vec![])));

        let config = config();
        let mut poller = Poller::new(&api, &messenger, &config);
        poller.run_cycle().await.unwrap();
        poller.run_cycle().await.unwrap();

        assert_eq!(api.calls(), vec![START, 2_000]);
        assert_eq!(poller.cursor(), 3_000);
    }

    #[tokio::test]
    async fn test_unchanged_record_is_not_notified_twice() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(Ok(response(2_000, vec![entry(1, "reviewing", "t1")])));
        api.push(Ok(response(3_000, vec![entry(1, "reviewing", "t1")])));
        api.push(Ok(response(4_000, vec![entry(1, "approved", "t2")])));

        let config = config();
        let mut poller = Poller::new(&api, &messenger, &config);
        let sent: Vec<usize> = vec![
            poller.run_cycle().await.unwrap().sent,
            poller.run_cycle().await.unwrap().sent,
            poller.run_cycle().await.unwrap().sent,
        ];

        assert_eq!(sent, vec![1, 0, 1]);
        let latest: Homework = serde_json::from_value(entry(1, "approved", "t2")).unwrap();
        assert!(!poller.seen().is_changed(&latest));
    }

    #[tokio::test]
    async fn test_bad_status_keeps_cursor() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(interpret_response(500, "https://example.com", "oops"));

        let config = config();
        let mut poller = Poller::new(&api, &messenger, &config);

        assert!(poller.tick().await.is_none());
        assert_eq!(poller.cursor(), START);
        let texts = messenger.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("Unexpected HTTP status 500"));
    }

    #[tokio::test]
    async fn test_malformed_body_then_recovery() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(interpret_response(200, "https://example.com", "{not json"));
        api.push(Ok(response(2_000, vec![entry(5, "approved", "t1")])));

        let config = config();
        let mut poller = Poller::new(&api, &messenger, &config);

        assert!(matches!(
            poller.run_cycle().await.unwrap_err(),
            AppError::Format(_)
        ));
        assert_eq!(poller.cursor(), START);

        let report = poller.tick().await.unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.cursor, 2_000);
        assert_eq!(api.calls(), vec![START, START]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_retries_after_one_interval() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(interpret_response(200, "https://example.com", "{not json"));
        api.push(Ok(response(2_000, vec![entry(1, "approved", "t1")])));

        let config = config();
        let interval = Duration::from_secs(config.poll.interval_secs);
        let mut poller = Poller::new(&api, &messenger, &config);

        let stopped =
            tokio::time::timeout(interval + Duration::from_secs(1), poller.run_forever()).await;
        assert!(stopped.is_err());

        assert_eq!(api.calls(), vec![START, START]);
        let times = api.call_times();
        assert_eq!(times[1] - times[0], interval);
        assert_eq!(poller.cursor(), 2_000);

        let texts = messenger.texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("Response format error"));
        assert!(texts[1].contains("hw_1.zip"));
    }

    #[tokio::test]
    async fn test_bad_shape_keeps_cursor() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(Ok(json!({"homeworks": []})));

        let config = config();
        let mut poller = Poller::new(&api, &messenger, &config).with_cursor(42);

        assert!(poller.tick().await.is_none());
        assert_eq!(poller.cursor(), 42);
    }

    #[tokio::test]
    async fn test_repeated_error_reported_once() {
        let api = FakeReviewApi::default();
        let messenger = FakeMessenger::default();
        api.push(Err(AppError::api("maintenance")));
        api.push(Err(AppError::api("maintenance")));

        let config = config();
        let mut poller = Poller::new(&api, &messenger, &config);
        poller.tick().await;
        poller.tick().await;

        assert_eq!(messenger.texts().len(), 1);
    }
}
