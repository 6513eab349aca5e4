use super::{Persisted, uuid_at};
use crate::domain::{TaskStatus, TaskType};
use anyhow::Result;
use rusqlite::Connection;
use uuid::Uuid;

impl Persisted for TaskStatus {
    const TABLE: &'static str = "Task_Statuses";

    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn insert_row(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO Task_Statuses (id, label) VALUES (?1, ?2)",
            (self.id().to_string(), self.label()),
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> Result<usize> {
        let changed = conn.execute(
            "UPDATE Task_Statuses SET label = ?2 WHERE id = ?1",
            (self.id().to_string(), self.label()),
        )?;
        Ok(changed)
    }

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>> {
        let mut stmt = conn.prepare("SELECT id, label FROM Task_Statuses WHERE id = ?1")?;
        let mut rows = stmt.query_map([id.to_string()], |row| {
            Ok(TaskStatus::with_id(uuid_at(row, 0)?, row.get::<_, String>(1)?))
        })?;

        match rows.next() {
            Some(row) => row.map(Some).map_err(Into::into),
            None => Ok(None),
        }
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, label FROM Task_Statuses ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(TaskStatus::with_id(uuid_at(row, 0)?, row.get::<_, String>(1)?))
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl Persisted for TaskType {
    const TABLE: &'static str = "Task_Types";

    fn entity_id(&self) -> Uuid {
        self.id()
    }

    fn insert_row(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO Task_Types (id, label) VALUES (?1, ?2)",
            (self.id().to_string(), self.label()),
        )?;
        Ok(())
    }

    fn update_row(&self, conn: &Connection) -> Result<usize> {
        let changed = conn.execute(
            "UPDATE Task_Types SET label = ?2 WHERE id = ?1",
            (self.id().to_string(), self.label()),
        )?;
        Ok(changed)
    }

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>> {
        let mut stmt = conn.prepare("SELECT id, label FROM Task_Types WHERE id = ?1")?;
        let mut rows = stmt.query_map([id.to_string()], |row| {
            Ok(TaskType::with_id(uuid_at(row, 0)?, row.get::<_, String>(1)?))
        })?;

        match rows.next() {
            Some(row) => row.map(Some).map_err(Into::into),
            None => Ok(None),
        }
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, label FROM Task_Types ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(TaskType::with_id(uuid_at(row, 0)?, row.get::<_, String>(1)?))
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
