//! Repository Module
//!
//! CRUD over the directory tables. Every check-then-write (uniqueness guard,
//! reference guard, cascading delete) runs inside a single transaction; the
//! schema's UNIQUE indexes back the in-transaction pre-checks, so a writer
//! that loses a race still observes a [`RepoError::Duplicate`].

pub mod department;
pub mod employee;

// Re-exports
pub use department::DepartmentRepository;
pub use employee::EmployeeRepository;

use std::fmt;

use thiserror::Error;

use crate::utils::validation::ConstraintViolation;

/// Which uniqueness invariant a rejected mutation collided with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuplicateKey {
    #[error("department name '{0}' already exists")]
    DepartmentName(String),

    #[error("email '{0}' already exists")]
    EmployeeEmail(String),

    #[error("username '{0}' already exists")]
    EmployeeUsername(String),
}

/// Violated field constraints, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Violations(pub Vec<ConstraintViolation>);

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(DuplicateKey),

    #[error("Validation error: {0}")]
    Validation(Violations),

    #[error("Dangling reference: {0}")]
    Reference(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl RepoError {
    pub(crate) fn validation(violations: Vec<ConstraintViolation>) -> Self {
        RepoError::Validation(Violations(violations))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Common repository trait for basic CRUD
///
/// The storage-agnostic capability set: any backend with atomic
/// check-then-write semantics can stand in for the SQLite implementations.
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> RepoResult<T>;
    async fn update(&self, id: i64, data: UpdateDto) -> RepoResult<T>;
    async fn delete(&self, id: i64) -> RepoResult<()>;
}

/// Column behind a UNIQUE index violation ("table.column"), when the error
/// is one. Used to turn race-lost inserts into typed duplicate errors.
pub(crate) fn unique_violation_column(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db) = err
        && db.is_unique_violation()
    {
        let msg = db.message();
        let column = msg.strip_prefix("UNIQUE constraint failed: ").unwrap_or(msg);
        return Some(column.trim().to_string());
    }
    None
}
