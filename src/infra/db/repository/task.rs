use super::{
    Persisted, Repository, Scan, UnitOfWork, opt_duration_at, opt_uuid_at, seconds, timestamp_at,
    uuid_at,
};
use crate::domain::{
    NewTask, Project, ProjectId, Task, TaskStatus, TaskStatusId, TaskType, TaskTypeId,
};
use crate::infra::db::RepositoryError;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, ToSql};
use std::time::Duration;
use uuid::Uuid;

const SELECT_TASKS: &str = r#"
    SELECT id, project_id, task_status_id, task_type_id, name, description, estimated_time, created_at
    FROM Tasks
"#;

struct TaskRow {
    id: Uuid,
    project_id: Uuid,
    task_status_id: Option<Uuid>,
    task_type_id: Option<Uuid>,
    name: String,
    description: String,
    estimated_time: Option<Duration>,
    created_at: DateTime<Utc>,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_at(row, 0)?,
            project_id: uuid_at(row, 1)?,
            task_status_id: opt_uuid_at(row, 2)?,
            task_type_id: opt_uuid_at(row, 3)?,
            name: row.get(4)?,
            description: row.get(5)?,
            estimated_time: opt_duration_at(row, 6)?,
            created_at: timestamp_at(row, 7)?,
        })
    }

    /// Resolves project, status and type, one query each (the project query
    /// resolves its client in turn).
    fn hydrate(self, conn: &Connection) -> Result<Task> {
        let project = Project::load(conn, &self.project_id)?.ok_or(
            RepositoryError::DanglingReference {
                table: "Tasks",
                column: "project_id",
                row_id: self.id,
                referenced_id: self.project_id,
            },
        )?;

        let status = match self.task_status_id {
            Some(status_id) => {
                let status = TaskStatus::load(conn, &status_id)?;
                if status.is_none() {
                    log::warn!("Task {} references missing status {}", self.id, status_id);
                }
                status
            }
            None => None,
        };

        let task_type = match self.task_type_id {
            Some(type_id) => {
                let task_type = TaskType::load(conn, &type_id)?;
                if task_type.is_none() {
                    log::warn!("Task {} references missing type {}", self.id, type_id);
                }
                task_type
            }
            None => None,
        };

        Ok(Task::with_id(
            self.id,
            NewTask {
                project,
                name: self.name,
                description: self.description,
                estimated_time: self.estimated_time,
                status,
                task_type,
                created_at: self.created_at,
            },
        ))
    }
}

fn query_tasks(
    conn: &Connection,
    filter: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!("{SELECT_TASKS} {filter}"))?;
    let rows = stmt
        .query_map(params, TaskRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|row| row.hydrate(conn)).collect()
}

impl Persisted for Task {
    const TABLE: &'static str = "Tasks";

    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn cascade(&self, uow: &mut UnitOfWork<'_>) -> Result<()> {
        uow.ensure(self.project())?;
        if let Some(status) = self.status() {
            uow.ensure(status)?;
        }
        if let Some(task_type) = self.task_type() {
            uow.ensure(task_type)?;
        }
        Ok(())
    }

    fn insert_row(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO Tasks (
                id, project_id, task_status_id, task_type_id,
                name, description, estimated_time, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.project().id().to_string(),
                self.status().map(|s| s.id().to_string()),
                self.task_type().map(|t| t.id().to_string()),
                self.name(),
                self.description(),
                self.estimated_time().map(seconds).transpose()?,
                self.created_at().timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> Result<usize> {
        let changed = conn.execute(
            r#"
            UPDATE Tasks
            SET project_id = ?2,
                task_status_id = ?3,
                task_type_id = ?4,
                name = ?5,
                description = ?6,
                estimated_time = ?7,
                created_at = ?8
            WHERE id = ?1
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.project().id().to_string(),
                self.status().map(|s| s.id().to_string()),
                self.task_type().map(|t| t.id().to_string()),
                self.name(),
                self.description(),
                self.estimated_time().map(seconds).transpose()?,
                self.created_at().timestamp_millis(),
            ],
        )?;
        Ok(changed)
    }

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>> {
        let tasks = query_tasks(conn, "WHERE id = ?1", rusqlite::params![id.to_string()])?;
        Ok(tasks.into_iter().next())
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        query_tasks(conn, "", rusqlite::params![])
    }
}

impl Repository<Task> {
    /// Tasks currently holding the given status, computed from storage.
    pub fn get_by_status(&self, status_id: &TaskStatusId) -> Result<Vec<Task>> {
        let conn = self.conn.lock();
        query_tasks(
            &conn,
            "WHERE task_status_id = ?1",
            rusqlite::params![status_id.to_string()],
        )
    }

    /// Tasks currently holding the given type, computed from storage.
    pub fn get_by_type(&self, type_id: &TaskTypeId) -> Result<Vec<Task>> {
        let conn = self.conn.lock();
        query_tasks(
            &conn,
            "WHERE task_type_id = ?1",
            rusqlite::params![type_id.to_string()],
        )
    }

    pub fn get_by_project(&self, project_id: &ProjectId) -> Result<Vec<Task>> {
        let conn = self.conn.lock();
        query_tasks(
            &conn,
            "WHERE project_id = ?1",
            rusqlite::params![project_id.to_string()],
        )
    }

    // Tolerant counterparts of the lookups above, see `Repository::scan_all`.

    pub fn scan_by_status(&self, status_id: &TaskStatusId) -> Result<Scan<Task>> {
        self.scan(
            "WHERE task_status_id = ?1",
            rusqlite::params![status_id.to_string()],
        )
    }

    pub fn scan_by_type(&self, type_id: &TaskTypeId) -> Result<Scan<Task>> {
        self.scan(
            "WHERE task_type_id = ?1",
            rusqlite::params![type_id.to_string()],
        )
    }

    pub fn scan_by_project(&self, project_id: &ProjectId) -> Result<Scan<Task>> {
        self.scan("WHERE project_id = ?1", rusqlite::params![project_id.to_string()])
    }
}
