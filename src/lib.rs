//! Core data layer for a department / employee directory.
//!
//! Two stores — departments, and the employees that reference them — with
//! uniqueness guards (department name, employee email and username), a
//! cascading department delete, and case-insensitive employee search.
//! Every check-then-write runs in a single transaction, and callers get
//! typed [`RepoError`] results; presentation concerns (forms, messages,
//! routing) live entirely outside this crate.

pub mod db;
pub mod utils;

pub use db::DbService;
pub use db::models::{
    Department, DepartmentCreate, DepartmentUpdate, Employee, EmployeeCreate, EmployeeUpdate,
};
pub use db::repository::{
    DepartmentRepository, DuplicateKey, EmployeeRepository, RepoError, RepoResult, Repository,
    Violations,
};
pub use utils::validation::ConstraintViolation;
