//! Employee Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::utils::validation::{self, ConstraintViolation, MAX_TEXT_LEN, SALARY_SCALE};

/// Employee entity
///
/// The salary is persisted as integer cents (`salary_cents`); validation caps
/// the scale at two digits so the conversion is exact in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub mobile_number: String,
    pub hiring_date: NaiveDate,
    pub salary: Decimal,
    pub username: String,
    pub password: String,
    pub department_id: i64,
}

// Manual row mapping: Decimal has no SQLite codec, so the salary column is
// decoded from cents here.
impl<'r> sqlx::FromRow<'r, SqliteRow> for Employee {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            middle_name: row.try_get("middle_name")?,
            last_name: row.try_get("last_name")?,
            address: row.try_get("address")?,
            email: row.try_get("email")?,
            mobile_number: row.try_get("mobile_number")?,
            hiring_date: row.try_get("hiring_date")?,
            salary: Decimal::new(row.try_get::<i64, _>("salary_cents")?, SALARY_SCALE),
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            department_id: row.try_get("department_id")?,
        })
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub mobile_number: String,
    pub hiring_date: NaiveDate,
    pub salary: Decimal,
    pub username: String,
    pub password: String,
    pub department_id: i64,
}

/// Update employee payload (full replace; the id is immutable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub mobile_number: String,
    pub hiring_date: NaiveDate,
    pub salary: Decimal,
    pub username: String,
    pub password: String,
    pub department_id: i64,
}

impl EmployeeCreate {
    /// Every field constraint: required text fields ≤255 chars, email syntax,
    /// password 8–15 chars, salary ≥ 0.01 at two-digit scale. The department
    /// reference is the repository's check, not a field constraint.
    pub fn validate(&self) -> Vec<ConstraintViolation> {
        validate_fields(
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.address,
            &self.email,
            &self.mobile_number,
            self.salary,
            &self.username,
            &self.password,
        )
    }

    pub(crate) fn salary_cents(&self) -> Option<i64> {
        to_cents(self.salary)
    }
}

impl EmployeeUpdate {
    /// Same field constraints as creation.
    pub fn validate(&self) -> Vec<ConstraintViolation> {
        validate_fields(
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.address,
            &self.email,
            &self.mobile_number,
            self.salary,
            &self.username,
            &self.password,
        )
    }

    pub(crate) fn salary_cents(&self) -> Option<i64> {
        to_cents(self.salary)
    }
}

#[allow(clippy::too_many_arguments)]
fn validate_fields(
    first_name: &str,
    middle_name: &str,
    last_name: &str,
    address: &str,
    email: &str,
    mobile_number: &str,
    salary: Decimal,
    username: &str,
    password: &str,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();
    validation::require_text(&mut violations, first_name, "first name", MAX_TEXT_LEN);
    validation::require_text(&mut violations, middle_name, "middle name", MAX_TEXT_LEN);
    validation::require_text(&mut violations, last_name, "last name", MAX_TEXT_LEN);
    validation::require_text(&mut violations, address, "address", MAX_TEXT_LEN);
    validation::require_email(&mut violations, email);
    validation::require_text(&mut violations, mobile_number, "mobile number", MAX_TEXT_LEN);
    validation::require_salary(&mut violations, salary);
    validation::require_text(&mut violations, username, "username", MAX_TEXT_LEN);
    validation::require_password(&mut violations, password);
    violations
}

// Exact for validated salaries (scale ≤ 2, magnitude < 10^8)
fn to_cents(salary: Decimal) -> Option<i64> {
    (salary * Decimal::ONE_HUNDRED).to_i64()
}
