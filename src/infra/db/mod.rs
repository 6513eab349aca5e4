//! SQLite persistence (infrastructure).

pub mod database;
pub mod error;
pub mod repository;

pub use database::Database;
pub use error::RepositoryError;
pub use repository::{
    ClientRepository, EntityKey, Persisted, ProjectRepository, ProjectTimeEntryRepository,
    Repository, Scan, TaskRepository, TaskStatusRepository, TaskTimeEntryRepository,
    TaskTypeRepository, UnitOfWork, Write, WriteKind,
};
