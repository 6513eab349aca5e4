//! Task statuses and task types.
//!
//! Both are plain labelled rows. Neither keeps a list of the tasks pointing at
//! it: that view is derived from storage on demand (see
//! `TaskRepository::get_by_status` and `TaskRepository::get_by_type`).

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task status
pub type TaskStatusId = Uuid;

/// Unique identifier for a task type
pub type TaskTypeId = Uuid;

/// Labels seeded into a fresh store.
pub const DEFAULT_TASK_STATUSES: [&str; 4] = ["Not Started", "In Progress", "Completed", "On Hold"];
pub const DEFAULT_TASK_TYPES: [&str; 4] = ["Design", "Development", "Meeting", "Admin"];

/// Progress state a task can be in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatus {
    id: TaskStatusId,
    label: String,
}

impl TaskStatus {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), label)
    }

    pub fn with_id(id: TaskStatusId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> TaskStatusId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.id, self.label)
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskType {
    id: TaskTypeId,
    label: String,
}

impl TaskType {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), label)
    }

    pub fn with_id(id: TaskTypeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> TaskTypeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.id, self.label)
    }
}
