//! SQLite store setup and connection management for TimeTracker.
//! Handles bootstrap (schema plus default labels), store reset and repository construction.

use super::repository::{
    ClientRepository, DbConn, ProjectRepository, ProjectTimeEntryRepository, TaskRepository,
    TaskStatusRepository, TaskTimeEntryRepository, TaskTypeRepository, UnitOfWork, Write,
};
use crate::domain::{DEFAULT_TASK_STATUSES, DEFAULT_TASK_TYPES};
use crate::infra::app_config;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Database wrapper that owns the single SQLite connection.
pub struct Database {
    conn: DbConn,
    path: Option<PathBuf>,
}

impl Database {
    /// Create or open the store at the configured location
    pub fn open() -> Result<Self> {
        Self::open_at(app_config::database_path())
    }

    /// Create an in-memory store (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        };
        db.initialize()?;
        Ok(db)
    }

    /// Create or open the store at a specific path
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        };
        db.initialize()?;
        Ok(db)
    }

    /// File backing the store; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creates the schema and seeds the default task statuses and types, but
    /// only when the store has no tables yet. Returns whether anything was done.
    pub fn initialize(&self) -> Result<bool> {
        let mut conn = self.conn.lock();

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )?;
        if table_count > 0 {
            return Ok(false);
        }

        let tx = conn.transaction()?;
        Self::create_schema(&tx)?;
        Self::seed_labels(&tx)?;
        tx.commit()?;

        log::debug!("Created schema and seeded default task statuses and types");
        Ok(true)
    }

    /// Names of the tables in the store, sorted.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        Self::table_names(&conn)
    }

    /// Drops every table and runs the bootstrap again.
    pub fn reset(&self) -> Result<()> {
        {
            let mut conn = self.conn.lock();
            let tables = Self::table_names(&conn)?;
            let tx = conn.transaction()?;
            for table in &tables {
                tx.execute(&format!("DROP TABLE IF EXISTS \"{table}\""), [])?;
            }
            tx.commit()?;
            log::debug!("Dropped {} tables", tables.len());
        }
        self.initialize()?;
        Ok(())
    }

    /// Row count per table, in table-name order.
    pub fn row_counts(&self) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock();
        Self::table_names(&conn)?
            .into_iter()
            .map(|table| -> Result<(String, i64)> {
                let count: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
                        row.get(0)
                    })?;
                Ok((table, count))
            })
            .collect()
    }

    /// Runs `work` inside one transaction and returns the rows it wrote, leaf
    /// references first. Nothing is kept when `work` fails.
    ///
    /// The connection lock is held until `work` returns and it is not
    /// reentrant: calling a repository from this `Database` (`db.task_repo()`
    /// and the like) inside `work` deadlocks. Write through
    /// [`UnitOfWork::insert`] or [`UnitOfWork::ensure`], and read through
    /// [`UnitOfWork::connection`] with
    /// [`Persisted::load`](super::Persisted::load), which also sees the rows
    /// written so far.
    pub fn unit_of_work<F>(&self, work: F) -> Result<Vec<Write>>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> Result<()>,
    {
        let mut conn = self.conn.lock();
        let mut uow = UnitOfWork::begin(&mut conn)?;
        work(&mut uow)?;
        uow.commit()
    }

    /// Get a handle on the shared connection
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    pub fn client_repo(&self) -> ClientRepository {
        ClientRepository::new(self.connection())
    }

    pub fn project_repo(&self) -> ProjectRepository {
        ProjectRepository::new(self.connection())
    }

    pub fn task_repo(&self) -> TaskRepository {
        TaskRepository::new(self.connection())
    }

    pub fn task_status_repo(&self) -> TaskStatusRepository {
        TaskStatusRepository::new(self.connection())
    }

    pub fn task_type_repo(&self) -> TaskTypeRepository {
        TaskTypeRepository::new(self.connection())
    }

    pub fn project_time_entry_repo(&self) -> ProjectTimeEntryRepository {
        ProjectTimeEntryRepository::new(self.connection())
    }

    pub fn task_time_entry_repo(&self) -> TaskTimeEntryRepository {
        TaskTimeEntryRepository::new(self.connection())
    }

    fn table_names(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        // Referential integrity is kept by the repositories, not the store.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Clients (
                id TEXT PRIMARY KEY,
                company TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                timezone TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Projects (
                id TEXT PRIMARY KEY,
                client_id TEXT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                estimated_time INTEGER,
                hourly_rate REAL NOT NULL,
                fixed_price REAL NOT NULL,
                created_at INTEGER NOT NULL,
                deadline INTEGER
            );

            CREATE TABLE IF NOT EXISTS Task_Statuses (
                id TEXT PRIMARY KEY,
                label TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Task_Types (
                id TEXT PRIMARY KEY,
                label TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Tasks (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                task_status_id TEXT,
                task_type_id TEXT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                estimated_time INTEGER,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS Project_Time_Entries (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                duration INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                is_billable INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS Task_Time_Entries (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                duration INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_projects_client_id ON Projects(client_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON Tasks(project_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_status_id ON Tasks(task_status_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_type_id ON Tasks(task_type_id);
            "#,
        )?;
        Ok(())
    }

    fn seed_labels(conn: &Connection) -> Result<()> {
        let mut insert_status =
            conn.prepare("INSERT INTO Task_Statuses (id, label) VALUES (?1, ?2)")?;
        for label in DEFAULT_TASK_STATUSES {
            insert_status.execute((Uuid::new_v4().to_string(), label))?;
        }

        let mut insert_type = conn.prepare("INSERT INTO Task_Types (id, label) VALUES (?1, ?2)")?;
        for label in DEFAULT_TASK_TYPES {
            insert_type.execute((Uuid::new_v4().to_string(), label))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_open_in_memory() -> Result<()> {
        let db = Database::open_in_memory()?;
        assert!(db.path().is_none());

        let conn = db.connection();
        let guard = conn.lock();
        let res: i32 = guard.query_row("SELECT 1", [], |row| row.get(0))?;
        assert_eq!(res, 1);
        Ok(())
    }

    #[test]
    fn test_bootstrap_creates_all_tables() -> Result<()> {
        let db = Database::open_in_memory()?;
        assert_eq!(
            db.list_tables()?,
            vec![
                "Clients",
                "Project_Time_Entries",
                "Projects",
                "Task_Statuses",
                "Task_Time_Entries",
                "Task_Types",
                "Tasks",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_seeding_is_idempotent() -> Result<()> {
        let db = Database::open_in_memory()?;

        assert!(!db.initialize()?);
        assert!(!db.initialize()?);

        let statuses = db.task_status_repo().get_all()?;
        let labels: Vec<&str> = statuses.iter().map(|s| s.label()).collect();
        assert_eq!(labels, DEFAULT_TASK_STATUSES);

        let types = db.task_type_repo().get_all()?;
        let labels: Vec<&str> = types.iter().map(|t| t.label()).collect();
        assert_eq!(labels, DEFAULT_TASK_TYPES);
        Ok(())
    }

    #[test]
    fn test_bootstrap_skips_store_with_foreign_tables() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("CREATE TABLE legacy (id TEXT PRIMARY KEY);")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        };

        assert!(!db.initialize()?);
        assert_eq!(db.list_tables()?, vec!["legacy"]);
        Ok(())
    }

    #[test]
    fn test_reset_drops_rows_and_reseeds() -> Result<()> {
        let db = Database::open_in_memory()?;
        let extra = crate::domain::TaskStatus::new("Blocked");
        db.task_status_repo().insert(&extra)?;
        assert_eq!(db.task_status_repo().get_all()?.len(), 5);

        db.reset()?;

        let statuses = db.task_status_repo().get_all()?;
        assert_eq!(statuses.len(), DEFAULT_TASK_STATUSES.len());
        assert!(statuses.iter().all(|s| s.id() != extra.id()));
        assert_eq!(db.list_tables()?.len(), 7);
        Ok(())
    }

    #[test]
    fn test_row_counts_after_bootstrap() -> Result<()> {
        let db = Database::open_in_memory()?;
        let counts = db.row_counts()?;

        assert!(counts.contains(&("Task_Statuses".to_string(), 4)));
        assert!(counts.contains(&("Task_Types".to_string(), 4)));
        assert!(counts.contains(&("Clients".to_string(), 0)));
        Ok(())
    }
}
