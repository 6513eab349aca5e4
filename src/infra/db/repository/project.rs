use super::{
    Persisted, Repository, UnitOfWork, opt_duration_at, opt_timestamp_at, opt_uuid_at, seconds,
    timestamp_at, uuid_at,
};
use crate::domain::{Client, ClientId, NewProject, Project};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, ToSql};
use std::time::Duration;
use uuid::Uuid;

const SELECT_PROJECTS: &str = r#"
    SELECT id, client_id, name, description, estimated_time, hourly_rate, fixed_price, created_at, deadline
    FROM Projects
"#;

struct ProjectRow {
    id: Uuid,
    client_id: Option<Uuid>,
    name: String,
    description: String,
    estimated_time: Option<Duration>,
    hourly_rate: f64,
    fixed_price: f64,
    created_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
}

impl ProjectRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_at(row, 0)?,
            client_id: opt_uuid_at(row, 1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            estimated_time: opt_duration_at(row, 4)?,
            hourly_rate: row.get(5)?,
            fixed_price: row.get(6)?,
            created_at: timestamp_at(row, 7)?,
            deadline: opt_timestamp_at(row, 8)?,
        })
    }

    /// Resolves `client_id` through the client loader. A client that has
    /// since been deleted leaves the project unassigned.
    fn hydrate(self, conn: &Connection) -> Result<Project> {
        let client = match self.client_id {
            Some(client_id) => {
                let client = Client::load(conn, &client_id)?;
                if client.is_none() {
                    log::warn!(
                        "Project {} references missing client {}; loading it unassigned",
                        self.id,
                        client_id
                    );
                }
                client
            }
            None => None,
        };

        let id = self.id;
        Project::with_id(
            id,
            NewProject {
                client,
                name: self.name,
                description: self.description,
                estimated_time: self.estimated_time,
                hourly_rate: self.hourly_rate,
                fixed_price: self.fixed_price,
                created_at: self.created_at,
                deadline: self.deadline,
            },
        )
        .with_context(|| format!("Stored project {id} failed validation"))
    }
}

fn query_projects(conn: &Connection, filter: &str, params: &[&dyn ToSql]) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(&format!("{SELECT_PROJECTS} {filter}"))?;
    let rows = stmt
        .query_map(params, ProjectRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(|row| row.hydrate(conn)).collect()
}

impl Persisted for Project {
    const TABLE: &'static str = "Projects";

    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn cascade(&self, uow: &mut UnitOfWork<'_>) -> Result<()> {
        if let Some(client) = self.client() {
            uow.ensure(client)?;
        }
        Ok(())
    }

    fn insert_row(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO Projects (
                id, client_id, name, description, estimated_time,
                hourly_rate, fixed_price, created_at, deadline
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.client().map(|c| c.id().to_string()),
                self.name(),
                self.description(),
                self.estimated_time().map(seconds).transpose()?,
                self.hourly_rate(),
                self.fixed_price(),
                self.created_at().timestamp_millis(),
                self.deadline().map(|d| d.timestamp_millis()),
            ],
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> Result<usize> {
        let changed = conn.execute(
            r#"
            UPDATE Projects
            SET client_id = ?2,
                name = ?3,
                description = ?4,
                estimated_time = ?5,
                hourly_rate = ?6,
                fixed_price = ?7,
                created_at = ?8,
                deadline = ?9
            WHERE id = ?1
            "#,
            rusqlite::params![
                self.id().to_string(),
                self.client().map(|c| c.id().to_string()),
                self.name(),
                self.description(),
                self.estimated_time().map(seconds).transpose()?,
                self.hourly_rate(),
                self.fixed_price(),
                self.created_at().timestamp_millis(),
                self.deadline().map(|d| d.timestamp_millis()),
            ],
        )?;
        Ok(changed)
    }

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>> {
        let projects = query_projects(conn, "WHERE id = ?1", rusqlite::params![id.to_string()])?;
        Ok(projects.into_iter().next())
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        query_projects(conn, "", rusqlite::params![])
    }
}

impl Repository<Project> {
    /// Projects assigned to the given client.
    pub fn get_by_client(&self, client_id: &ClientId) -> Result<Vec<Project>> {
        let conn = self.conn.lock();
        query_projects(
            &conn,
            "WHERE client_id = ?1",
            rusqlite::params![client_id.to_string()],
        )
    }
}
