//! Input validation helpers
//!
//! Centralized text length constants and field-level checks. Each check pushes
//! tagged [`ConstraintViolation`]s into a caller-owned list so an entity's
//! `validate()` can report every broken constraint at once instead of failing
//! on the first.

use rust_decimal::Decimal;
use thiserror::Error;

// ── Field limits ────────────────────────────────────────────────────

/// Names, addresses, emails, usernames: at most 255 chars
pub const MAX_TEXT_LEN: usize = 255;

/// Password bounds (stored as provided)
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 15;

/// Salaries carry exactly two fractional digits
pub const SALARY_SCALE: u32 = 2;

/// Smallest accepted salary: 0.01
pub const MIN_SALARY: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Exclusive salary upper bound, matching a (10,2) decimal column
pub const MAX_SALARY: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("{field} must not be empty")]
    Required { field: &'static str },

    #[error("{field} is too long ({len} chars, max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("email is not a valid address")]
    InvalidEmail,

    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },

    #[error("salary must be at least {}", MIN_SALARY)]
    SalaryTooSmall,

    #[error("salary must be below {}", MAX_SALARY)]
    SalaryTooLarge,

    #[error("salary must have at most {} decimal places", SALARY_SCALE)]
    SalaryScale,
}

// ── Field checks ────────────────────────────────────────────────────

/// Required text field: non-empty and within the length limit.
pub fn require_text(
    violations: &mut Vec<ConstraintViolation>,
    value: &str,
    field: &'static str,
    max_len: usize,
) {
    if value.trim().is_empty() {
        violations.push(ConstraintViolation::Required { field });
        return;
    }
    // Character count, not bytes: multibyte names within the limit pass
    let len = value.chars().count();
    if len > max_len {
        violations.push(ConstraintViolation::TooLong {
            field,
            len,
            max: max_len,
        });
    }
}

/// Required email field: non-empty, within the length limit, plausible shape.
pub fn require_email(violations: &mut Vec<ConstraintViolation>, value: &str) {
    require_text(violations, value, "email", MAX_TEXT_LEN);
    if !value.trim().is_empty() && !is_valid_email(value) {
        violations.push(ConstraintViolation::InvalidEmail);
    }
}

/// Minimal shape check: one '@', non-empty local part, dotted domain.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Required password field, 8–15 characters.
pub fn require_password(violations: &mut Vec<ConstraintViolation>, value: &str) {
    if value.is_empty() {
        violations.push(ConstraintViolation::Required { field: "password" });
        return;
    }
    let len = value.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        violations.push(ConstraintViolation::PasswordLength {
            min: PASSWORD_MIN_LEN,
            max: PASSWORD_MAX_LEN,
        });
    }
}

/// Salary: at least 0.01, below the (10,2) column bound, scale at most 2.
pub fn require_salary(violations: &mut Vec<ConstraintViolation>, value: Decimal) {
    if value < MIN_SALARY {
        violations.push(ConstraintViolation::SalaryTooSmall);
    }
    if value >= MAX_SALARY {
        violations.push(ConstraintViolation::SalaryTooLarge);
    }
    if value.normalize().scale() > SALARY_SCALE {
        violations.push(ConstraintViolation::SalaryScale);
    }
}
