use super::{Persisted, row_exists};
use anyhow::Result;
use rusqlite::{Connection, Transaction};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
}

/// One row written by a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub table: &'static str,
    pub id: Uuid,
    pub kind: WriteKind,
}

/// A group of writes committed as a single SQLite transaction.
///
/// Referenced entities are written before the entities that point at them, so
/// the recorded writes are always ordered leaf first. Dropping the unit of
/// work without calling [`UnitOfWork::commit`] rolls every write back.
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
    writes: Vec<Write>,
}

impl<'conn> UnitOfWork<'conn> {
    pub fn begin(conn: &'conn mut Connection) -> Result<Self> {
        Ok(Self {
            tx: conn.transaction()?,
            writes: Vec::new(),
        })
    }

    /// Inserts `entity` after ensuring everything it references.
    pub fn insert<E: Persisted>(&mut self, entity: &E) -> Result<()> {
        entity.cascade(self)?;
        entity.insert_row(&self.tx)?;
        self.writes.push(Write {
            table: E::TABLE,
            id: entity.entity_id(),
            kind: WriteKind::Insert,
        });
        Ok(())
    }

    /// Updates `entity` after ensuring everything it references. Returns the
    /// number of rows changed.
    pub fn update<E: Persisted>(&mut self, entity: &E) -> Result<usize> {
        entity.cascade(self)?;
        let changed = entity.update_row(&self.tx)?;
        if changed > 0 {
            self.writes.push(Write {
                table: E::TABLE,
                id: entity.entity_id(),
                kind: WriteKind::Update,
            });
        }
        Ok(changed)
    }

    /// Inserts `entity` only when no row with its id exists yet.
    ///
    /// An existing row is never overwritten, even when the in-memory copy
    /// carries different field values.
    pub fn ensure<E: Persisted>(&mut self, entity: &E) -> Result<()> {
        if row_exists(&self.tx, E::TABLE, &entity.entity_id())? {
            return Ok(());
        }
        log::debug!(
            "Cascade: inserting missing {} row {}",
            E::TABLE,
            entity.entity_id()
        );
        self.insert(entity)
    }

    /// Connection scoped to this unit of work; reads see uncommitted writes.
    pub fn connection(&self) -> &Connection {
        &self.tx
    }

    /// Writes performed so far, leaf references first.
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn commit(self) -> Result<Vec<Write>> {
        self.tx.commit()?;
        Ok(self.writes)
    }
}
