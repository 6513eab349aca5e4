use super::project::Project;
use super::task_label::{TaskStatus, TaskType};
use super::time::{millisecond_precision, now, whole_seconds};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a task
pub type TaskId = Uuid;

/// Caller-supplied fields of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub project: Project,
    pub name: String,
    pub description: String,
    pub estimated_time: Option<Duration>,
    pub status: Option<TaskStatus>,
    pub task_type: Option<TaskType>,
    pub created_at: DateTime<Utc>,
}

impl NewTask {
    /// Task without estimate, status or type, created now.
    pub fn named(project: Project, name: impl Into<String>) -> Self {
        Self {
            project,
            name: name.into(),
            description: String::new(),
            estimated_time: None,
            status: None,
            task_type: None,
            created_at: now(),
        }
    }
}

/// A unit of work inside a project.
///
/// The status and type are plain references: reassigning them is a single
/// field write and does not touch the status/type values themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: TaskId,
    project: Project,
    name: String,
    description: String,
    estimated_time: Option<Duration>,
    status: Option<TaskStatus>,
    task_type: Option<TaskType>,
    created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(fields: NewTask) -> Self {
        Self::with_id(Uuid::new_v4(), fields)
    }

    pub fn with_id(id: TaskId, fields: NewTask) -> Self {
        let mut task = Self {
            id,
            project: fields.project,
            name: fields.name,
            description: fields.description,
            estimated_time: None,
            status: fields.status,
            task_type: fields.task_type,
            created_at: fields.created_at,
        };
        task.set_estimated_time(fields.estimated_time);
        task.set_created_at(fields.created_at);
        task
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn set_project(&mut self, project: Project) {
        self.project = project;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn estimated_time(&self) -> Option<Duration> {
        self.estimated_time
    }

    pub fn set_estimated_time(&mut self, estimated_time: Option<Duration>) {
        self.estimated_time = estimated_time.map(whole_seconds);
    }

    pub fn status(&self) -> Option<&TaskStatus> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: Option<TaskStatus>) {
        self.status = status;
    }

    pub fn task_type(&self) -> Option<&TaskType> {
        self.task_type.as_ref()
    }

    pub fn set_task_type(&mut self, task_type: Option<TaskType>) {
        self.task_type = task_type;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = millisecond_precision(created_at);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} (project: {})",
            self.id,
            self.name,
            self.project.name()
        )?;
        if let Some(status) = &self.status {
            write!(f, " status={}", status.label())?;
        }
        if let Some(task_type) = &self.task_type {
            write!(f, " type={}", task_type.label())?;
        }
        if let Some(estimate) = self.estimated_time {
            write!(f, " estimate={}s", estimate.as_secs())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewProject;

    #[test]
    fn test_status_reassignment_does_not_touch_labels() {
        let project = Project::new(NewProject::named("Website Redesign")).unwrap();
        let todo = TaskStatus::new("Not Started");
        let doing = TaskStatus::new("In Progress");

        let mut fields = NewTask::named(project, "Wireframes");
        fields.status = Some(todo.clone());
        let mut task = Task::new(fields);

        task.set_status(Some(doing.clone()));
        assert_eq!(task.status(), Some(&doing));
        assert_eq!(todo.label(), "Not Started");

        task.set_status(None);
        assert!(task.status().is_none());
    }
}
