//! Employee Repository

use sqlx::{SqliteConnection, SqlitePool};

use super::{DuplicateKey, RepoError, RepoResult, Repository, unique_violation_column};
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};

const EMPLOYEE_SELECT: &str = "SELECT id, first_name, middle_name, last_name, address, email, mobile_number, hiring_date, salary_cents, username, password, department_id FROM employee";

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Email existence check backing the creation-time uniqueness guard.
    /// Exact match.
    pub async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employee WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Username existence check backing the creation-time uniqueness guard.
    /// Exact match.
    pub async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employee WHERE username = ?")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Case-insensitive substring match against first or last name.
    /// An empty fragment matches every employee.
    pub async fn search_by_name(&self, fragment: &str) -> RepoResult<Vec<Employee>> {
        let sql = format!(
            "{EMPLOYEE_SELECT} WHERE lower(first_name) LIKE '%' || lower(?1) || '%' ESCAPE '\\' OR lower(last_name) LIKE '%' || lower(?1) || '%' ESCAPE '\\' ORDER BY id"
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(escape_like(fragment))
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    /// Case-insensitive substring match against the associated department name.
    pub async fn search_by_department_name(&self, fragment: &str) -> RepoResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT e.id, e.first_name, e.middle_name, e.last_name, e.address, e.email, e.mobile_number, e.hiring_date, e.salary_cents, e.username, e.password, e.department_id FROM employee e JOIN department d ON e.department_id = d.id WHERE lower(d.name) LIKE '%' || lower(?1) || '%' ESCAPE '\\' ORDER BY e.id",
        )
        .bind(escape_like(fragment))
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }
}

/// Escape LIKE metacharacters so a search fragment matches literally,
/// not as a pattern.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Reference guard: the department an employee points at must exist.
async fn department_resolves(conn: &mut SqliteConnection, department_id: i64) -> RepoResult<()> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM department WHERE id = ?")
        .bind(department_id)
        .fetch_one(conn)
        .await?;
    if count == 0 {
        return Err(RepoError::Reference(format!(
            "Department {department_id} not found"
        )));
    }
    Ok(())
}

impl Repository<Employee, EmployeeCreate, EmployeeUpdate> for EmployeeRepository {
    /// Insertion order: AUTOINCREMENT ids are monotonic
    async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let sql = format!("{EMPLOYEE_SELECT} ORDER BY id");
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Employee>> {
        let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn create(&self, data: EmployeeCreate) -> RepoResult<Employee> {
        let violations = data.validate();
        if !violations.is_empty() {
            return Err(RepoError::validation(violations));
        }
        let salary_cents = data
            .salary_cents()
            .ok_or_else(|| RepoError::Database("Salary out of range".into()))?;

        let mut tx = self.pool.begin().await?;

        department_resolves(&mut *tx, data.department_id).await?;

        // Duplicate checks in declared order: email first, then username
        let email_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employee WHERE email = ?")
                .bind(&data.email)
                .fetch_one(&mut *tx)
                .await?;
        if email_taken > 0 {
            return Err(RepoError::Duplicate(DuplicateKey::EmployeeEmail(data.email)));
        }

        let username_taken =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employee WHERE username = ?")
                .bind(&data.username)
                .fetch_one(&mut *tx)
                .await?;
        if username_taken > 0 {
            return Err(RepoError::Duplicate(DuplicateKey::EmployeeUsername(
                data.username,
            )));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO employee (first_name, middle_name, last_name, address, email, mobile_number, hiring_date, salary_cents, username, password, department_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) RETURNING id",
        )
        .bind(&data.first_name)
        .bind(&data.middle_name)
        .bind(&data.last_name)
        .bind(&data.address)
        .bind(&data.email)
        .bind(&data.mobile_number)
        .bind(data.hiring_date)
        .bind(salary_cents)
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.department_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match unique_violation_column(&e).as_deref() {
            // Race loser: a pre-check passed but another writer landed first
            Some("employee.email") => {
                RepoError::Duplicate(DuplicateKey::EmployeeEmail(data.email.clone()))
            }
            Some("employee.username") => {
                RepoError::Duplicate(DuplicateKey::EmployeeUsername(data.username.clone()))
            }
            _ => e.into(),
        })?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
    }

    /// Full re-validation and reference check; email/username uniqueness is
    /// creation-time only, so a row may be saved back with its own values.
    /// The UNIQUE indexes stay as a backstop against cross-row collisions.
    async fn update(&self, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
        let violations = data.validate();
        if !violations.is_empty() {
            return Err(RepoError::validation(violations));
        }
        let salary_cents = data
            .salary_cents()
            .ok_or_else(|| RepoError::Database("Salary out of range".into()))?;

        let mut tx = self.pool.begin().await?;

        department_resolves(&mut *tx, data.department_id).await?;

        let rows = sqlx::query(
            "UPDATE employee SET first_name = ?1, middle_name = ?2, last_name = ?3, address = ?4, email = ?5, mobile_number = ?6, hiring_date = ?7, salary_cents = ?8, username = ?9, password = ?10, department_id = ?11 WHERE id = ?12",
        )
        .bind(&data.first_name)
        .bind(&data.middle_name)
        .bind(&data.last_name)
        .bind(&data.address)
        .bind(&data.email)
        .bind(&data.mobile_number)
        .bind(data.hiring_date)
        .bind(salary_cents)
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.department_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match unique_violation_column(&e).as_deref() {
            Some("employee.email") => {
                RepoError::Duplicate(DuplicateKey::EmployeeEmail(data.email.clone()))
            }
            Some("employee.username") => {
                RepoError::Duplicate(DuplicateKey::EmployeeUsername(data.username.clone()))
            }
            _ => e.into(),
        })?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Employee {id} not found")));
        }

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Employee {id} not found")));
        }
        Ok(())
    }
}
