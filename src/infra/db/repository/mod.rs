//! Repository implementations for data access in TimeTracker.
//!
//! Every entity kind gets the same five operations through [`Repository`]:
//! `get_all`, `get_by_id`, `insert`, `update` and `delete`. What differs per
//! entity (table, columns, row mapping, which references must exist before a
//! write) lives in its [`Persisted`] implementation.
//!
//! Reads hydrate the full object graph eagerly: loading a task loads its
//! project, the project's client, the task status and the task type, one query
//! each. Writes go through a [`UnitOfWork`], which inserts missing referenced
//! rows first and commits everything in one transaction.

mod client;
mod project;
mod task;
mod task_label;
mod time_entry;
mod unit_of_work;

pub use unit_of_work::{UnitOfWork, Write, WriteKind};

use crate::domain::{
    Client, Project, ProjectTimeEntry, Task, TaskStatus, TaskTimeEntry, TaskType,
};
use crate::infra::db::RepositoryError;
use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, ToSql};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub type DbConn = Arc<Mutex<Connection>>;

pub type ClientRepository = Repository<Client>;
pub type ProjectRepository = Repository<Project>;
pub type TaskRepository = Repository<Task>;
pub type TaskStatusRepository = Repository<TaskStatus>;
pub type TaskTypeRepository = Repository<TaskType>;
pub type ProjectTimeEntryRepository = Repository<ProjectTimeEntry>;
pub type TaskTimeEntryRepository = Repository<TaskTimeEntry>;

/// Table mapping for one entity kind.
///
/// Loaders take the connection they run on so nested references are resolved
/// through the same connection (and, during a unit of work, the same
/// transaction).
pub trait Persisted: Sized {
    /// Owning table. Always a compile-time constant, never user input.
    const TABLE: &'static str;

    fn entity_id(&self) -> Uuid;

    /// Makes sure every entity this one references exists before it is written.
    /// Implementations call [`UnitOfWork::ensure`] for each reference, required
    /// reference first, optional ones afterwards in a fixed order.
    fn cascade(&self, _uow: &mut UnitOfWork<'_>) -> Result<()> {
        Ok(())
    }

    fn insert_row(&self, conn: &Connection) -> Result<()>;

    /// Returns the number of rows changed (0 when the id is unknown).
    fn update_row(&self, conn: &Connection) -> Result<usize>;

    fn load(conn: &Connection, id: &Uuid) -> Result<Option<Self>>;

    fn load_all(conn: &Connection) -> Result<Vec<Self>>;
}

/// Anything `get_by_id` accepts: a typed id or its text form.
pub trait EntityKey {
    /// `None` when the key cannot name any stored row.
    fn to_entity_id(&self) -> Option<Uuid>;
}

impl EntityKey for Uuid {
    fn to_entity_id(&self) -> Option<Uuid> {
        Some(*self)
    }
}

impl EntityKey for &Uuid {
    fn to_entity_id(&self) -> Option<Uuid> {
        Some(**self)
    }
}

impl EntityKey for &str {
    fn to_entity_id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.trim()).ok()
    }
}

impl EntityKey for String {
    fn to_entity_id(&self) -> Option<Uuid> {
        self.as_str().to_entity_id()
    }
}

impl EntityKey for &String {
    fn to_entity_id(&self) -> Option<Uuid> {
        self.as_str().to_entity_id()
    }
}

/// Rows read by a listing that does not stop at dangling references.
#[derive(Debug)]
pub struct Scan<E> {
    pub loaded: Vec<E>,
    /// One error per row whose required parent is no longer stored.
    pub dangling: Vec<RepositoryError>,
}

impl<E> Default for Scan<E> {
    fn default() -> Self {
        Self {
            loaded: Vec::new(),
            dangling: Vec::new(),
        }
    }
}

/// CRUD access to the table of one entity kind.
pub struct Repository<E> {
    conn: DbConn,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Persisted> Repository<E> {
    pub fn new(conn: DbConn) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// Every row of the table, fully hydrated. Empty table gives an empty vec.
    pub fn get_all(&self) -> Result<Vec<E>> {
        let conn = self.conn.lock();
        E::load_all(&conn)
    }

    /// The row with the given id, or `None` when there is no such row.
    pub fn get_by_id<K: EntityKey>(&self, key: K) -> Result<Option<E>> {
        let Some(id) = key.to_entity_id() else {
            return Ok(None);
        };
        let conn = self.conn.lock();
        E::load(&conn, &id)
    }

    /// Inserts the entity after inserting any referenced entity that is not
    /// stored yet. Existing referenced rows are left as they are.
    pub fn insert(&self, entity: &E) -> Result<()> {
        let mut conn = self.conn.lock();
        let mut uow = UnitOfWork::begin(&mut conn)?;
        uow.insert(entity)?;
        uow.commit()?;
        Ok(())
    }

    /// Updates the row keyed by the entity's id. Missing references are
    /// inserted first; referenced rows that already exist are not rewritten.
    pub fn update(&self, entity: &E) -> Result<()> {
        let mut conn = self.conn.lock();
        let mut uow = UnitOfWork::begin(&mut conn)?;
        if uow.update(entity)? == 0 {
            log::debug!(
                "Update of {} row {} matched nothing",
                E::TABLE,
                entity.entity_id()
            );
        }
        uow.commit()?;
        Ok(())
    }

    /// Deletes the row by id. Rows referencing it are kept as they are.
    pub fn delete(&self, entity: &E) -> Result<usize> {
        self.delete_by_id(entity.entity_id())
    }

    /// Deletes the row with this id without loading it, so a row whose
    /// references dangle can still be removed. A malformed key deletes nothing.
    pub fn delete_by_id<K: EntityKey>(&self, key: K) -> Result<usize> {
        let Some(id) = key.to_entity_id() else {
            return Ok(0);
        };
        let conn = self.conn.lock();
        let affected = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", E::TABLE),
            [id.to_string()],
        )?;
        Ok(affected)
    }

    /// Like [`Repository::get_all`], but rows whose required parent is gone
    /// are set aside in [`Scan::dangling`] instead of failing the read.
    pub fn scan_all(&self) -> Result<Scan<E>> {
        self.scan("", rusqlite::params![])
    }

    /// Loads the rows matching `filter` one id at a time. Only
    /// [`RepositoryError`]s are set aside; any other error is returned.
    fn scan(&self, filter: &str, params: &[&dyn ToSql]) -> Result<Scan<E>> {
        let conn = self.conn.lock();
        let ids = {
            let mut stmt = conn.prepare(&format!(
                "SELECT id FROM {} {filter} ORDER BY rowid",
                E::TABLE
            ))?;
            let rows = stmt.query_map(params, |row| uuid_at(row, 0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut scan = Scan::default();
        for id in ids {
            match E::load(&conn, &id) {
                Ok(Some(entity)) => scan.loaded.push(entity),
                Ok(None) => {}
                Err(err) => {
                    let dangling = err.downcast::<RepositoryError>()?;
                    log::warn!("Skipping {} row {id}: {dangling}", E::TABLE);
                    scan.dangling.push(dangling);
                }
            }
        }
        Ok(scan)
    }

    /// Whether a row with this id is stored.
    pub fn exists(&self, id: &Uuid) -> Result<bool> {
        let conn = self.conn.lock();
        row_exists(&conn, E::TABLE, id)
    }
}

fn row_exists(conn: &Connection, table: &'static str, id: &Uuid) -> Result<bool> {
    let found: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(found)
}

// Column helpers shared by the row mappers.

fn conversion_failure(
    idx: usize,
    ty: Type,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, err.into())
}

fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| conversion_failure(idx, Type::Text, e))
}

fn opt_uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    row.get::<_, Option<String>>(idx)?
        .map(|text| Uuid::parse_str(&text).map_err(|e| conversion_failure(idx, Type::Text, e)))
        .transpose()
}

fn millis_to_timestamp(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        conversion_failure(
            idx,
            Type::Integer,
            format!("timestamp {millis} is out of range"),
        )
    })
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    millis_to_timestamp(idx, row.get(idx)?)
}

fn opt_timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<i64>>(idx)?
        .map(|millis| millis_to_timestamp(idx, millis))
        .transpose()
}

fn seconds_to_duration(idx: usize, seconds: i64) -> rusqlite::Result<Duration> {
    u64::try_from(seconds)
        .map(Duration::from_secs)
        .map_err(|e| conversion_failure(idx, Type::Integer, e))
}

fn duration_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Duration> {
    seconds_to_duration(idx, row.get(idx)?)
}

fn opt_duration_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Duration>> {
    row.get::<_, Option<i64>>(idx)?
        .map(|seconds| seconds_to_duration(idx, seconds))
        .transpose()
}

fn seconds(duration: Duration) -> Result<i64> {
    Ok(i64::try_from(duration.as_secs())?)
}
