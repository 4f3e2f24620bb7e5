//! Data models
//!
//! Row types implement `sqlx::FromRow`; all IDs are `i64`
//! (SQLite INTEGER PRIMARY KEY). Each entity ships with `Create`/`Update`
//! payload types and a `validate()` returning every violated constraint.

pub mod department;
pub mod employee;

// Re-exports
pub use department::*;
pub use employee::*;
