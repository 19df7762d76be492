use crate::config::Config;
use crate::format::format_seconds_to_hhmmss;
use crate::task::{CompletedTask, CurrentTask, TimerError};
use serde::{Deserialize, Serialize};
use tempo_ipc::{CompletedSummary, TaskState, TaskStatus};
use tracing::{info, warn};

/// Owns the singleton active-task slot and the completed-task archive.
/// Every time-touching method takes `now` (epoch millis) from the caller;
/// the app never reads a clock itself.
#[derive(Clone, Serialize, Deserialize)]
pub struct App {
    pub current: Option<CurrentTask>,
    pub completed: Vec<CompletedTask>,
    #[serde(skip)]
    pub mode: AppMode,
    #[serde(skip)]
    pub input_buffer: String,
    #[serde(skip)]
    pub config: Config,
    #[serde(skip)]
    pub should_quit: bool,
}

#[derive(Default, Clone, PartialEq, Debug)]
pub enum AppMode {
    #[default]
    Normal,
    NamingTask,
    RenamingTask,
    ShowHelp,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            current: None,
            completed: Vec::new(),
            mode: AppMode::Normal,
            input_buffer: String::new(),
            config,
            should_quit: false,
        }
    }

    pub fn start_task(&mut self, name: &str, now: i64) -> Result<(), TimerError> {
        if self.current.is_some() {
            return Err(TimerError::InvalidState(
                "a task is already active".to_string(),
            ));
        }
        let task = CurrentTask::start(name, now)?;
        info!(task = %task.name, "started task");
        self.current = Some(task);
        Ok(())
    }

    pub fn pause_task(&mut self, now: i64) -> Result<(), TimerError> {
        self.active_task()?.pause(now)
    }

    pub fn resume_task(&mut self, now: i64) -> Result<(), TimerError> {
        self.active_task()?.resume(now)
    }

    /// Pause a running task or resume a paused one.
    pub fn toggle_pause(&mut self, now: i64) -> Result<(), TimerError> {
        let task = self.active_task()?;
        if task.is_paused {
            task.resume(now)
        } else {
            task.pause(now)
        }
    }

    fn active_task(&mut self) -> Result<&mut CurrentTask, TimerError> {
        self.current
            .as_mut()
            .ok_or_else(|| TimerError::InvalidState("no active task".to_string()))
    }

    pub fn rename_task(&mut self, new_name: &str) -> Result<(), TimerError> {
        self.active_task()?.rename(new_name)
    }

    /// Archives the active task. On success the slot is empty and exactly
    /// one record has been appended; on failure the task stays in place.
    pub fn complete_task(&mut self, now: i64) -> Result<CompletedTask, TimerError> {
        let task = self
            .current
            .take()
            .ok_or_else(|| TimerError::InvalidState("no active task".to_string()))?;
        match task.complete(now) {
            Ok(done) => {
                info!(task = %done.name, duration = done.duration_seconds, "completed task");
                self.completed.push(done.clone());
                Ok(done)
            }
            Err((task, e)) => {
                self.current = Some(task);
                Err(e)
            }
        }
    }

    /// The recurring display refresh. Skew errors are logged, not surfaced;
    /// the stale snapshot is still usable.
    pub fn on_tick(&mut self, now: i64) {
        if let Some(task) = self.current.as_mut() {
            if let Err(e) = task.tick(now) {
                warn!(error = %e, "tick skipped");
            }
        }
    }

    pub fn open_name_input(&mut self) {
        if self.current.is_none() {
            self.input_buffer.clear();
            self.mode = AppMode::NamingTask;
        }
    }

    /// Opens the rename editor pre-filled with the current name.
    pub fn open_rename_input(&mut self) {
        if let Some(task) = &self.current {
            self.input_buffer = task.name.clone();
            self.mode = AppMode::RenamingTask;
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.mode = AppMode::Normal;
    }

    pub fn handle_char(&mut self, c: char, now: i64) {
        match self.mode {
            AppMode::NamingTask => {
                if c == '\n' {
                    let name = self.input_buffer.trim().to_string();
                    if !name.is_empty() {
                        if let Err(e) = self.start_task(&name, now) {
                            warn!(error = %e, "could not start task");
                        }
                    }
                    self.input_buffer.clear();
                    self.mode = AppMode::Normal;
                } else {
                    self.input_buffer.push(c);
                }
            }
            AppMode::RenamingTask => {
                if c == '\n' {
                    let name = self.input_buffer.trim().to_string();
                    if !name.is_empty() {
                        if let Err(e) = self.rename_task(&name) {
                            warn!(error = %e, "rename rejected");
                        }
                    }
                    self.input_buffer.clear();
                    self.mode = AppMode::Normal;
                } else if c == ' ' {
                    // Space cancels the edit and restores the original name
                    self.cancel_input();
                } else {
                    self.input_buffer.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        if matches!(self.mode, AppMode::NamingTask | AppMode::RenamingTask) {
            self.input_buffer.pop();
        }
    }

    pub fn status(&self) -> TaskStatus {
        match &self.current {
            None => TaskStatus {
                state: TaskState::Idle,
                name: None,
                elapsed_seconds: 0,
            },
            Some(task) => TaskStatus {
                state: if task.is_paused {
                    TaskState::Paused
                } else {
                    TaskState::Running
                },
                name: Some(task.name.clone()),
                elapsed_seconds: task.elapsed_seconds.max(0.0) as u64,
            },
        }
    }

    pub fn completed_summaries(&self) -> Vec<CompletedSummary> {
        self.completed
            .iter()
            .map(|t| CompletedSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                duration_seconds: t.duration_seconds.max(0.0) as u64,
            })
            .collect()
    }

    pub fn notify_completion(&self, done: &CompletedTask) {
        if let Err(e) = notify_rust::Notification::new()
            .summary(&done.name)
            .body(&format!(
                "Completed in {}",
                format_seconds_to_hhmmss(done.duration_seconds)
            ))
            .appname("tempo")
            .show()
        {
            warn!(error = %e, "failed to send notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default())
    }

    #[test]
    fn only_one_task_may_be_active() {
        let mut app = app();
        app.start_task("first", 0).unwrap();
        assert!(matches!(
            app.start_task("second", 1_000),
            Err(TimerError::InvalidState(_))
        ));
        assert_eq!(app.current.as_ref().unwrap().name, "first");
    }

    #[test]
    fn toggle_pause_flips_between_states() {
        let mut app = app();
        app.start_task("x", 0).unwrap();
        app.toggle_pause(2_000).unwrap();
        assert!(app.current.as_ref().unwrap().is_paused);
        app.toggle_pause(5_000).unwrap();
        assert!(!app.current.as_ref().unwrap().is_paused);
    }

    #[test]
    fn completing_appends_exactly_one_record_and_empties_the_slot() {
        let mut app = app();
        app.start_task("x", 0).unwrap();
        let done = app.complete_task(3_000).unwrap();
        assert_eq!(done.duration_seconds, 3.0);
        assert!(app.current.is_none());
        assert_eq!(app.completed.len(), 1);
        assert_eq!(app.completed[0], done);
    }

    #[test]
    fn completing_with_no_task_fails() {
        let mut app = app();
        assert!(matches!(
            app.complete_task(0),
            Err(TimerError::InvalidState(_))
        ));
        assert!(app.completed.is_empty());
    }

    #[test]
    fn rename_commits_on_enter() {
        let mut app = app();
        app.start_task("Old Task", 0).unwrap();
        app.open_rename_input();
        assert_eq!(app.mode, AppMode::RenamingTask);
        assert_eq!(app.input_buffer, "Old Task");

        app.input_buffer.clear();
        for c in "NewTask".chars() {
            app.handle_char(c, 1_000);
        }
        app.handle_char('\n', 1_000);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.current.as_ref().unwrap().name, "NewTask");
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn rename_cancels_on_space_and_restores_the_original_name() {
        let mut app = app();
        app.start_task("Old Task", 0).unwrap();
        app.open_rename_input();

        app.input_buffer.clear();
        for c in "Changed".chars() {
            app.handle_char(c, 1_000);
        }
        app.handle_char(' ', 1_000);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.current.as_ref().unwrap().name, "Old Task");
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn rename_with_empty_buffer_leaves_the_name_alone() {
        let mut app = app();
        app.start_task("Old Task", 0).unwrap();
        app.open_rename_input();
        app.input_buffer.clear();
        app.handle_char('\n', 1_000);
        assert_eq!(app.current.as_ref().unwrap().name, "Old Task");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn naming_input_starts_a_task_on_enter() {
        let mut app = app();
        app.open_name_input();
        for c in "Deep work".chars() {
            app.handle_char(c, 0);
        }
        app.handle_char('\n', 0);
        assert_eq!(app.current.as_ref().unwrap().name, "Deep work");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn rename_input_is_unavailable_without_a_task() {
        let mut app = app();
        app.open_rename_input();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn status_reflects_the_slot() {
        let mut app = app();
        assert_eq!(app.status().state, TaskState::Idle);
        app.start_task("x", 0).unwrap();
        app.on_tick(90_000);
        let status = app.status();
        assert_eq!(status.state, TaskState::Running);
        assert_eq!(status.elapsed_seconds, 90);
        assert_eq!(status.name.as_deref(), Some("x"));
    }
}
