use super::{
    Persisted, Repository, Scan, UnitOfWork, duration_at, seconds, timestamp_at, uuid_at,
};
use crate::domain::{Project, ProjectId, ProjectTimeEntry, Task, TaskId, TaskTimeEntry};
use crate::infra::db::RepositoryError;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, ToSql};
use std::time::Duration;
use uuid::Uuid;

struct ProjectTimeEntryRow {
    id: Uuid,
    project_id: Uuid,
    duration: Duration,
    created_at: DateTime<Utc>,
    is_billable: bool,
}

impl ProjectTimeEntryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_at(row, 0)?,
            project_id: uuid_at(row, 1)?,
            duration: duration_at(row, 2)?,
            created_at: timestamp_at(row, 3)?,
            is_billable: row.get(4)?,
        })
    }

    fn hydrate(self, conn: &Connection) -> Result<ProjectTimeEntry> {
        let project = Project::load(conn, &self.project_id)?.ok_or(
            RepositoryError::DanglingReference {
                table: "Project_Time_Entries",
                column: "project_id",
                row_id: self.id,
                referenced_id: self.project_id,
            },
        )?;
        Ok(ProjectTimeEntry::with_id(
            self.id,
            project,
            self.duration,
            self.created_at,
            self.is_billable,
        ))
    }
}

fn query_project_entries(
    conn: &Connection,
    filter: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<ProjectTimeEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, project_id, duration, created_at, is_billable FROM Project_Time_Entries {filter}"
    ))?;
    let rows = stmt
        .query_map(params, ProjectTimeEntryRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|row| row.hydrate(conn)).collect()
}

impl Persisted for ProjectTimeEntry {
    const TABLE: &'static str = "Project_Time_Entries";

    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn cascade(&self, uow: &mut UnitOfWork<'_>) -> Result<()> {
        uow.ensure(self.project())
    }

    fn insert_row(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO Project_Time_Entries (id, project_id, duration, created_at, is_billable)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.project().id().to_string(),
                seconds(self.duration())?,
                self.created_at().timestamp_millis(),
                self.is_billable(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> Result<usize> {
        let changed = conn.execute(
            r#"
            UPDATE Project_Time_Entries
            SET project_id = ?2, duration = ?3, created_at = ?4, is_billable = ?5
            WHERE id = ?1
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.project().id().to_string(),
                seconds(self.duration())?,
                self.created_at().timestamp_millis(),
                self.is_billable(),
            ],
        )?;
        Ok(changed)
    }

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>> {
        let entries =
            query_project_entries(conn, "WHERE id = ?1", rusqlite::params![id.to_string()])?;
        Ok(entries.into_iter().next())
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        query_project_entries(conn, "", rusqlite::params![])
    }
}

impl Repository<ProjectTimeEntry> {
    pub fn get_by_project(&self, project_id: &ProjectId) -> Result<Vec<ProjectTimeEntry>> {
        let conn = self.conn.lock();
        query_project_entries(
            &conn,
            "WHERE project_id = ?1",
            rusqlite::params![project_id.to_string()],
        )
    }

    pub fn scan_by_project(&self, project_id: &ProjectId) -> Result<Scan<ProjectTimeEntry>> {
        self.scan("WHERE project_id = ?1", rusqlite::params![project_id.to_string()])
    }
}

struct TaskTimeEntryRow {
    id: Uuid,
    task_id: Uuid,
    duration: Duration,
    created_at: DateTime<Utc>,
}

impl TaskTimeEntryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_at(row, 0)?,
            task_id: uuid_at(row, 1)?,
            duration: duration_at(row, 2)?,
            created_at: timestamp_at(row, 3)?,
        })
    }

    fn hydrate(self, conn: &Connection) -> Result<TaskTimeEntry> {
        let task = Task::load(conn, &self.task_id)?.ok_or(RepositoryError::DanglingReference {
            table: "Task_Time_Entries",
            column: "task_id",
            row_id: self.id,
            referenced_id: self.task_id,
        })?;
        Ok(TaskTimeEntry::with_id(
            self.id,
            task,
            self.duration,
            self.created_at,
        ))
    }
}

fn query_task_entries(
    conn: &Connection,
    filter: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<TaskTimeEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, task_id, duration, created_at FROM Task_Time_Entries {filter}"
    ))?;
    let rows = stmt
        .query_map(params, TaskTimeEntryRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|row| row.hydrate(conn)).collect()
}

impl Persisted for TaskTimeEntry {
    const TABLE: &'static str = "Task_Time_Entries";

    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn cascade(&self, uow: &mut UnitOfWork<'_>) -> Result<()> {
        uow.ensure(self.task())
    }

    fn insert_row(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO Task_Time_Entries (id, task_id, duration, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.task().id().to_string(),
                seconds(self.duration())?,
                self.created_at().timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> Result<usize> {
        let changed = conn.execute(
            r#"
            UPDATE Task_Time_Entries
            SET task_id = ?2, duration = ?3, created_at = ?4
            WHERE id = ?1
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.task().id().to_string(),
                seconds(self.duration())?,
                self.created_at().timestamp_millis(),
            ],
        )?;
        Ok(changed)
    }

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>> {
        let entries = query_task_entries(conn, "WHERE id = ?1", rusqlite::params![id.to_string()])?;
        Ok(entries.into_iter().next())
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        query_task_entries(conn, "", rusqlite::params![])
    }
}

impl Repository<TaskTimeEntry> {
    pub fn get_by_task(&self, task_id: &TaskId) -> Result<Vec<TaskTimeEntry>> {
        let conn = self.conn.lock();
        query_task_entries(
            &conn,
            "WHERE task_id = ?1",
            rusqlite::params![task_id.to_string()],
        )
    }

    pub fn scan_by_task(&self, task_id: &TaskId) -> Result<Scan<TaskTimeEntry>> {
        self.scan("WHERE task_id = ?1", rusqlite::params![task_id.to_string()])
    }
}
