//! Elapsed-time accounting for the single active task.
//!
//! All operations take the current time as an argument instead of reading
//! a wall clock, so the whole state machine is deterministic under test.
//! Timestamps are epoch milliseconds; durations are fractional seconds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// The one in-progress task. At most one of these exists at a time;
/// the slot that owns it lives in [`crate::app::App`].
///
/// `elapsed_seconds` is a display snapshot refreshed by [`CurrentTask::tick`].
/// The authoritative figure at any instant is
/// `accumulated_seconds + (is_paused ? 0 : (now - last_resume_time) / 1000)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTask {
    pub id: String,
    pub name: String,
    /// When the task was first started.
    pub start_time: i64,
    /// When the task last entered the running state.
    pub last_resume_time: i64,
    /// Snapshot of total elapsed seconds as of the last tick.
    pub elapsed_seconds: f64,
    /// Seconds accrued by all closed running intervals.
    pub accumulated_seconds: f64,
    pub is_paused: bool,
}

/// Archival record produced exactly once when a task completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: String,
    pub name: String,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_seconds: f64,
}

impl CurrentTask {
    /// Starts a new task in the running state.
    pub fn start(name: &str, now: i64) -> Result<Self, TimerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TimerError::InvalidArgument(
                "task name must not be empty".to_string(),
            ));
        }
        if now < 0 {
            return Err(TimerError::InvalidArgument(format!(
                "negative timestamp: {now}"
            )));
        }
        Ok(Self {
            id: format!("task-{now}"),
            name: name.to_string(),
            start_time: now,
            last_resume_time: now,
            elapsed_seconds: 0.0,
            accumulated_seconds: 0.0,
            is_paused: false,
        })
    }

    /// Closes the open running interval and freezes the task.
    pub fn pause(&mut self, now: i64) -> Result<(), TimerError> {
        if self.is_paused {
            return Err(TimerError::InvalidState(
                "task is already paused".to_string(),
            ));
        }
        let interval = self.open_interval_seconds(now)?;
        self.accumulated_seconds += interval;
        self.elapsed_seconds = self.accumulated_seconds;
        self.is_paused = true;
        Ok(())
    }

    /// Opens a new running interval starting at `now`.
    pub fn resume(&mut self, now: i64) -> Result<(), TimerError> {
        if !self.is_paused {
            return Err(TimerError::InvalidState(
                "task is already running".to_string(),
            ));
        }
        if now < self.last_resume_time {
            return Err(TimerError::InvalidArgument(format!(
                "timestamp {now} is earlier than the previous resume"
            )));
        }
        self.last_resume_time = now;
        self.is_paused = false;
        Ok(())
    }

    /// Refreshes the `elapsed_seconds` snapshot. Idempotent for equal `now`;
    /// the snapshot is its only side effect.
    pub fn tick(&mut self, now: i64) -> Result<(), TimerError> {
        if self.is_paused {
            self.elapsed_seconds = self.accumulated_seconds;
            return Ok(());
        }
        let interval = self.open_interval_seconds(now)?;
        self.elapsed_seconds = self.accumulated_seconds + interval;
        Ok(())
    }

    /// Replaces the task name. The name is trimmed and must stay non-empty.
    pub fn rename(&mut self, new_name: &str) -> Result<(), TimerError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(TimerError::InvalidArgument(
                "task name must not be empty".to_string(),
            ));
        }
        self.name = new_name.to_string();
        Ok(())
    }

    /// Consumes the task and produces its archival record. A running task is
    /// implicitly paused first; completing an already-paused task folds
    /// nothing further in. On error the task is handed back untouched so the
    /// caller can put it back in its slot.
    pub fn complete(mut self, now: i64) -> Result<CompletedTask, (Self, TimerError)> {
        if !self.is_paused {
            if let Err(e) = self.pause(now) {
                return Err((self, e));
            }
        } else if let Err(e) = self.open_interval_seconds(now) {
            // nothing left to fold, but a skewed end time is still rejected
            return Err((self, e));
        }
        Ok(CompletedTask {
            id: self.id,
            name: self.name,
            start_time: self.start_time,
            end_time: now,
            duration_seconds: self.accumulated_seconds,
        })
    }

    fn open_interval_seconds(&self, now: i64) -> Result<f64, TimerError> {
        if now < self.last_resume_time {
            return Err(TimerError::InvalidArgument(format!(
                "timestamp {now} is earlier than the last resume at {}",
                self.last_resume_time
            )));
        }
        Ok((now - self.last_resume_time) as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_begins_running_at_zero() {
        let task = CurrentTask::start("Write report", 1_000).unwrap();
        assert_eq!(task.name, "Write report");
        assert_eq!(task.start_time, 1_000);
        assert_eq!(task.last_resume_time, 1_000);
        assert_eq!(task.elapsed_seconds, 0.0);
        assert_eq!(task.accumulated_seconds, 0.0);
        assert!(!task.is_paused);
    }

    #[test]
    fn start_trims_and_rejects_empty_names() {
        let task = CurrentTask::start("  padded  ", 0).unwrap();
        assert_eq!(task.name, "padded");
        assert!(matches!(
            CurrentTask::start("   ", 0),
            Err(TimerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn start_rejects_negative_timestamp() {
        assert!(matches!(
            CurrentTask::start("x", -1),
            Err(TimerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn pause_folds_the_open_interval() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.pause(5_000).unwrap();
        assert!(task.is_paused);
        assert_eq!(task.accumulated_seconds, 5.0);
        assert_eq!(task.elapsed_seconds, 5.0);
    }

    #[test]
    fn pause_when_paused_fails_and_leaves_task_unmodified() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.pause(5_000).unwrap();
        let before = task.clone();
        assert!(matches!(
            task.pause(9_000),
            Err(TimerError::InvalidState(_))
        ));
        assert_eq!(task, before);
    }

    #[test]
    fn resume_when_running_fails_and_leaves_task_unmodified() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        let before = task.clone();
        assert!(matches!(
            task.resume(2_000),
            Err(TimerError::InvalidState(_))
        ));
        assert_eq!(task, before);
    }

    #[test]
    fn duration_sums_all_running_intervals() {
        // run 5s, pause 10s, run 3s, pause 2s, run 4s, complete
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.pause(5_000).unwrap();
        task.resume(15_000).unwrap();
        task.pause(18_000).unwrap();
        task.resume(20_000).unwrap();
        let done = task.complete(24_000).unwrap();
        assert_eq!(done.duration_seconds, 12.0);
        assert_eq!(done.start_time, 0);
        assert_eq!(done.end_time, 24_000);
    }

    #[test]
    fn paused_time_is_excluded_from_elapsed() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.pause(1_000).unwrap();
        // a long paused stretch must not move the snapshot
        task.tick(1_000_000).unwrap();
        assert_eq!(task.elapsed_seconds, 1.0);
    }

    #[test]
    fn tick_is_idempotent_for_equal_now() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.tick(7_500).unwrap();
        let first = task.elapsed_seconds;
        task.tick(7_500).unwrap();
        assert_eq!(task.elapsed_seconds, first);
        assert_eq!(first, 7.5);
    }

    #[test]
    fn tick_rejects_clock_skew_while_running() {
        let mut task = CurrentTask::start("x", 10_000).unwrap();
        let before = task.clone();
        assert!(matches!(
            task.tick(9_999),
            Err(TimerError::InvalidArgument(_))
        ));
        assert_eq!(task, before);
    }

    #[test]
    fn rename_replaces_name_in_place() {
        let mut task = CurrentTask::start("Old Task", 0).unwrap();
        task.rename("New Task").unwrap();
        assert_eq!(task.name, "New Task");
    }

    #[test]
    fn rename_rejects_whitespace_only_names() {
        let mut task = CurrentTask::start("Old Task", 0).unwrap();
        assert!(matches!(
            task.rename(" \t "),
            Err(TimerError::InvalidArgument(_))
        ));
        assert_eq!(task.name, "Old Task");
    }

    #[test]
    fn complete_implicitly_pauses_a_running_task() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.pause(2_000).unwrap();
        task.resume(10_000).unwrap();
        let done = task.complete(13_000).unwrap();
        assert_eq!(done.duration_seconds, 5.0);
    }

    #[test]
    fn complete_on_a_paused_task_uses_accumulated_as_is() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.pause(4_000).unwrap();
        let done = task.complete(60_000).unwrap();
        assert_eq!(done.duration_seconds, 4.0);
        assert_eq!(done.end_time, 60_000);
    }

    #[test]
    fn complete_on_a_paused_task_rejects_a_skewed_end_time() {
        let mut task = CurrentTask::start("x", 10_000).unwrap();
        task.pause(14_000).unwrap();
        let (task, err) = task.complete(5_000).unwrap_err();
        assert!(matches!(err, TimerError::InvalidArgument(_)));
        // the task comes back paused and unchanged, never an inverted record
        assert!(task.is_paused);
        assert_eq!(task.accumulated_seconds, 4.0);
        let done = task.complete(20_000).unwrap();
        assert!(done.end_time >= done.start_time);
    }

    #[test]
    fn complete_with_skewed_clock_hands_the_task_back() {
        let task = CurrentTask::start("x", 10_000).unwrap();
        let (task, err) = task.complete(5_000).unwrap_err();
        assert!(matches!(err, TimerError::InvalidArgument(_)));
        assert_eq!(task.name, "x");
        assert!(!task.is_paused);
    }

    #[test]
    fn snapshot_is_stale_until_the_next_tick() {
        let mut task = CurrentTask::start("x", 0).unwrap();
        task.tick(1_000).unwrap();
        assert_eq!(task.elapsed_seconds, 1.0);
        // time passes without a tick; the snapshot lags on purpose
        task.pause(3_000).unwrap();
        assert_eq!(task.elapsed_seconds, 3.0);
    }
}
