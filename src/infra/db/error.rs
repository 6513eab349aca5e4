//! Error types raised by the SQLite layer beyond plain `rusqlite` failures.

use thiserror::Error;
use uuid::Uuid;

/// A stored row could not be turned back into an entity.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A required foreign key points at a row that no longer exists
    /// (its parent was deleted; deletes never cascade).
    #[error("{table}.{column} of row {row_id} references missing row {referenced_id}")]
    DanglingReference {
        table: &'static str,
        column: &'static str,
        row_id: Uuid,
        referenced_id: Uuid,
    },
}
