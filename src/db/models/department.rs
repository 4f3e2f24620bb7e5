//! Department Model

use serde::{Deserialize, Serialize};

use crate::utils::validation::{self, ConstraintViolation, MAX_TEXT_LEN};

/// Department entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// Create department payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCreate {
    pub name: String,
}

/// Update department payload (full replace; the id is immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    pub name: String,
}

impl DepartmentCreate {
    /// Field constraints: non-empty name, at most 255 chars.
    pub fn validate(&self) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        validation::require_text(&mut violations, &self.name, "name", MAX_TEXT_LEN);
        violations
    }
}

impl DepartmentUpdate {
    /// Same field constraints as creation.
    pub fn validate(&self) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        validation::require_text(&mut violations, &self.name, "name", MAX_TEXT_LEN);
        violations
    }
}
