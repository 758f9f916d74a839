//! Change detection against previously seen homework states.
//!
//! Keeps the last delivered `(status, date_updated)` per homework id so a
//! record that reappears unchanged in a later response is not announced twice.

use std::collections::{HashMap, HashSet};

use crate::models::{Homework, HomeworkStatus};

/// Last delivered state of one homework.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SeenState {
    status: HomeworkStatus,
    date_updated: String,
}

impl From<&Homework> for SeenState {
    fn from(homework: &Homework) -> Self {
        Self {
            status: homework.status,
            date_updated: homework.date_updated.clone(),
        }
    }
}

/// Previously-seen map keyed by homework id.
#[derive(Debug, Clone, Default)]
pub struct SeenStatuses {
    states: HashMap<i64, SeenState>,
}

impl SeenStatuses {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `homework` differs from what was last delivered for its id.
    pub fn is_changed(&self, homework: &Homework) -> bool {
        match self.states.get(&homework.id) {
            Some(seen) => {
                seen.status != homework.status || seen.date_updated != homework.date_updated
            }
            None => true,
        }
    }

    /// Select the records that need a notification, in input order.
    ///
    /// Exact repeats inside the same batch are reported once.
    pub fn changed<'a>(&self, homeworks: &'a [Homework]) -> Vec<&'a Homework> {
        let mut batch_seen: HashSet<(i64, HomeworkStatus, &str)> = HashSet::new();
        homeworks
            .iter()
            .filter(|h| self.is_changed(h))
            .filter(|h| batch_seen.insert((h.id, h.status, h.date_updated.as_str())))
            .collect()
    }

    /// Remember `homework` as delivered.
    pub fn record(&mut self, homework: &Homework) {
        self.states.insert(homework.id, SeenState::from(homework));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_homework(id: i64, status: HomeworkStatus, updated: &str) -> Homework {
        Homework {
            id,
            homework_name: format!("hw_{}.zip", id),
            status,
            date_updated: updated.to_string(),
            lesson_name: "Lesson".into(),
            reviewer_comment: "".into(),
        }
    }

    #[test]
    fn test_unseen_is_changed() {
        let seen = SeenStatuses::new();
        let hw = make_homework(1, HomeworkStatus::Reviewing, "2024-01-01T00:00:00Z");
        assert!(seen.is_changed(&hw));
    }

    #[test]
    fn test_unchanged_is_suppressed() {
        let mut seen = SeenStatuses::new();
        let hw = make_homework(1, HomeworkStatus::Reviewing, "2024-01-01T00:00:00Z");
        seen.record(&hw);

        assert!(!seen.is_changed(&hw.clone()));
        assert!(seen.changed(&[hw]).is_empty());
    }

    #[test]
    fn test_new_date_updated_is_changed() {
        let mut seen = SeenStatuses::new();
        seen.record(&make_homework(1, HomeworkStatus::Rejected, "2024-01-01T00:00:00Z"));

        let resubmitted = make_homework(1, HomeworkStatus::Rejected, "2024-01-05T00:00:00Z");
        assert!(seen.is_changed(&resubmitted));
    }

    #[test]
    fn test_new_status_is_changed() {
        let mut seen = SeenStatuses::new();
        seen.record(&make_homework(1, HomeworkStatus::Reviewing, "2024-01-01T00:00:00Z"));

        let approved = make_homework(1, HomeworkStatus::Approved, "2024-01-01T00:00:00Z");
        assert!(seen.is_changed(&approved));
    }

    #[test]
    fn test_changed_keeps_order_and_drops_batch_repeats() {
        let mut seen = SeenStatuses::new();
        seen.record(&make_homework(2, HomeworkStatus::Approved, "t1"));

        let batch = vec![
            make_homework(3, HomeworkStatus::Reviewing, "t2"),
            make_homework(2, HomeworkStatus::Approved, "t1"),
            make_homework(1, HomeworkStatus::Rejected, "t3"),
            make_homework(3, HomeworkStatus::Reviewing, "t2"),
        ];

        let ids: Vec<i64> = seen.changed(&batch).iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_record_overwrites() {
        let mut seen = SeenStatuses::new();
        seen.record(&make_homework(1, HomeworkStatus::Reviewing, "t1"));
        seen.record(&make_homework(1, HomeworkStatus::Approved, "t2"));

        assert_eq!(seen.states.len(), 1);
        assert!(!seen.is_changed(&make_homework(1, HomeworkStatus::Approved, "t2")));
    }
}
