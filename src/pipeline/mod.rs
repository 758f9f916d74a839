//! Pipeline stages for one polling cycle.
//!
//! - `check_response`: validate the raw API response
//! - `SeenStatuses`: suppress already delivered states
//! - `notify_changes`: send chat messages for changed homeworks
//! - `Poller`: cursor handling and the forever loop

pub mod diff;
pub mod notify;
pub mod poll;
pub mod validate;

pub use diff::SeenStatuses;
pub use notify::{ErrorReporter, NotifyOutcome, notify_changes, render_error_report};
pub use poll::{CycleReport, Poller};
pub use validate::check_response;
