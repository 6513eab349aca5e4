use super::project::Project;
use super::task::Task;
use super::time::{millisecond_precision, now, whole_seconds};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a time entry
pub type TimeEntryId = Uuid;

/// Time logged directly against a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTimeEntry {
    id: TimeEntryId,
    project: Project,
    duration: Duration,
    created_at: DateTime<Utc>,
    is_billable: bool,
}

impl ProjectTimeEntry {
    /// Logs `duration` against `project`, stamped now.
    pub fn new(project: Project, duration: Duration, is_billable: bool) -> Self {
        Self::with_id(Uuid::new_v4(), project, duration, now(), is_billable)
    }

    pub fn with_id(
        id: TimeEntryId,
        project: Project,
        duration: Duration,
        created_at: DateTime<Utc>,
        is_billable: bool,
    ) -> Self {
        Self {
            id,
            project,
            duration: whole_seconds(duration),
            created_at: millisecond_precision(created_at),
            is_billable,
        }
    }

    pub fn id(&self) -> TimeEntryId {
        self.id
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn set_project(&mut self, project: Project) {
        self.project = project;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = whole_seconds(duration);
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = millisecond_precision(created_at);
    }

    pub fn is_billable(&self) -> bool {
        self.is_billable
    }

    pub fn set_billable(&mut self, is_billable: bool) {
        self.is_billable = is_billable;
    }
}

impl fmt::Display for ProjectTimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {}s on project {} at {}{}",
            self.id,
            self.duration.as_secs(),
            self.project.name(),
            self.created_at.to_rfc3339(),
            if self.is_billable { " (billable)" } else { "" }
        )
    }
}

/// Time logged against a single task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTimeEntry {
    id: TimeEntryId,
    task: Task,
    duration: Duration,
    created_at: DateTime<Utc>,
}

impl TaskTimeEntry {
    pub fn new(task: Task, duration: Duration) -> Self {
        Self::with_id(Uuid::new_v4(), task, duration, now())
    }

    pub fn with_id(
        id: TimeEntryId,
        task: Task,
        duration: Duration,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task,
            duration: whole_seconds(duration),
            created_at: millisecond_precision(created_at),
        }
    }

    pub fn id(&self) -> TimeEntryId {
        self.id
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn set_task(&mut self, task: Task) {
        self.task = task;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = whole_seconds(duration);
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = millisecond_precision(created_at);
    }
}

impl fmt::Display for TaskTimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {}s on task {} at {}",
            self.id,
            self.duration.as_secs(),
            self.task.name(),
            self.created_at.to_rfc3339()
        )
    }
}
