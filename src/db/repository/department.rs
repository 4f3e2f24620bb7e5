//! Department Repository

use sqlx::SqlitePool;

use super::{DuplicateKey, RepoError, RepoResult, Repository, unique_violation_column};
use crate::db::models::{Department, DepartmentCreate, DepartmentUpdate};

#[derive(Clone)]
pub struct DepartmentRepository {
    pool: SqlitePool,
}

impl DepartmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find department by exact name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        let department = sqlx::query_as::<_, Department>(
            "SELECT id, name FROM department WHERE name = ? LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(department)
    }

    /// Name existence check backing the uniqueness guard. Exact match:
    /// the BINARY collation keeps this case-sensitive.
    pub async fn name_exists(&self, name: &str) -> RepoResult<bool> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM department WHERE name = ?")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }
}

impl Repository<Department, DepartmentCreate, DepartmentUpdate> for DepartmentRepository {
    /// Insertion order: AUTOINCREMENT ids are monotonic
    async fn find_all(&self) -> RepoResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name FROM department ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(departments)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Department>> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name FROM department WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(department)
    }

    async fn create(&self, data: DepartmentCreate) -> RepoResult<Department> {
        let violations = data.validate();
        if !violations.is_empty() {
            return Err(RepoError::validation(violations));
        }

        let mut tx = self.pool.begin().await?;

        // Check duplicate name
        let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM department WHERE name = ?")
            .bind(&data.name)
            .fetch_one(&mut *tx)
            .await?;
        if taken > 0 {
            return Err(RepoError::Duplicate(DuplicateKey::DepartmentName(data.name)));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO department (name) VALUES (?) RETURNING id",
        )
        .bind(&data.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match unique_violation_column(&e).as_deref() {
            // Race loser: the pre-check passed but another writer landed first
            Some("department.name") => {
                RepoError::Duplicate(DuplicateKey::DepartmentName(data.name.clone()))
            }
            _ => e.into(),
        })?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create department".into()))
    }

    async fn update(&self, id: i64, data: DepartmentUpdate) -> RepoResult<Department> {
        let violations = data.validate();
        if !violations.is_empty() {
            return Err(RepoError::validation(violations));
        }

        let mut tx = self.pool.begin().await?;

        // A department may keep its own name; only a different holder collides
        let clash = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM department WHERE name = ? AND id != ?",
        )
        .bind(&data.name)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if clash > 0 {
            return Err(RepoError::Duplicate(DuplicateKey::DepartmentName(data.name)));
        }

        let rows = sqlx::query("UPDATE department SET name = ? WHERE id = ?")
            .bind(&data.name)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if rows.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Department {id} not found")));
        }

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Department {id} not found")))
    }

    /// Delete a department and every employee referencing it, atomically.
    async fn delete(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM department WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(format!("Department {id} not found")));
        }

        // Cascade: dependents go first, in the same transaction (no orphans)
        let removed = sqlx::query("DELETE FROM employee WHERE department_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM department WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(department_id = id, employees_removed = removed, "department deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::EmployeeCreate;
    use crate::db::repository::EmployeeRepository;
    use crate::utils::validation::ConstraintViolation;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    fn dept(name: &str) -> DepartmentCreate {
        DepartmentCreate { name: name.into() }
    }

    fn emp(email: &str, username: &str, department_id: i64) -> EmployeeCreate {
        EmployeeCreate {
            first_name: "John".into(),
            middle_name: "Q".into(),
            last_name: "Doe".into(),
            address: "1 Main St".into(),
            email: email.into(),
            mobile_number: "555-0100".into(),
            hiring_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            salary: Decimal::new(350_000, 2), // 3500.00
            username: username.into(),
            password: "secret123".into(),
            department_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_in_insertion_order() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        let it = repo.create(dept("IT")).await.unwrap();
        let hr = repo.create(dept("HR")).await.unwrap();
        assert!(it.id < hr.id);

        let all = repo.find_all().await.unwrap();
        assert_eq!(
            all.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            vec!["IT", "HR"]
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_name_rejected() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        repo.create(dept("IT")).await.unwrap();
        let err = repo.create(dept("IT")).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Duplicate(DuplicateKey::DepartmentName(name)) if name == "IT"
        ));
    }

    #[tokio::test]
    async fn test_name_uniqueness_is_case_sensitive() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        repo.create(dept("IT")).await.unwrap();
        // Different case is a different name under the exact-match guard
        repo.create(dept("it")).await.unwrap();

        assert!(repo.name_exists("IT").await.unwrap());
        assert!(repo.name_exists("it").await.unwrap());
        assert!(!repo.name_exists("It").await.unwrap());
        assert!(!repo.name_exists("I").await.unwrap());

        assert_eq!(repo.find_by_name("it").await.unwrap().unwrap().name, "it");
        assert!(repo.find_by_name("It").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_validates_name() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        let err = repo.create(dept("")).await.unwrap_err();
        match err {
            RepoError::Validation(violations) => {
                assert_eq!(
                    violations.0,
                    vec![ConstraintViolation::Required { field: "name" }]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let err = repo.create(dept(&"x".repeat(256))).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_own_name_allowed() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        let it = repo.create(dept("IT")).await.unwrap();
        let updated = repo
            .update(it.id, DepartmentUpdate { name: "IT".into() })
            .await
            .unwrap();
        assert_eq!(updated, it);
    }

    #[tokio::test]
    async fn test_update_rejects_other_departments_name() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        repo.create(dept("IT")).await.unwrap();
        let hr = repo.create(dept("HR")).await.unwrap();

        let err = repo
            .update(hr.id, DepartmentUpdate { name: "IT".into() })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Duplicate(DuplicateKey::DepartmentName(_))
        ));
        // Unchanged
        assert_eq!(repo.find_by_id(hr.id).await.unwrap().unwrap().name, "HR");
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        let err = repo
            .update(999, DepartmentUpdate { name: "IT".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_id_has_no_side_effects() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        repo.create(dept("IT")).await.unwrap();
        let err = repo.delete(999).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_employees() {
        let pool = test_pool().await;
        let departments = DepartmentRepository::new(pool.clone());
        let employees = EmployeeRepository::new(pool);

        let it = departments.create(dept("IT")).await.unwrap();
        let hr = departments.create(dept("HR")).await.unwrap();

        employees.create(emp("a@b.com", "u1", it.id)).await.unwrap();
        employees.create(emp("c@d.com", "u2", it.id)).await.unwrap();
        let kept = employees.create(emp("e@f.com", "u3", hr.id)).await.unwrap();

        departments.delete(it.id).await.unwrap();

        assert!(departments.find_by_id(it.id).await.unwrap().is_none());
        let remaining = employees.find_all().await.unwrap();
        assert_eq!(remaining, vec![kept]);
    }

    #[tokio::test]
    async fn test_find_by_id_is_idempotent() {
        let pool = test_pool().await;
        let repo = DepartmentRepository::new(pool);

        let it = repo.create(dept("IT")).await.unwrap();
        let first = repo.find_by_id(it.id).await.unwrap();
        let second = repo.find_by_id(it.id).await.unwrap();
        assert_eq!(first, second);
        assert!(repo.find_by_id(12345).await.unwrap().is_none());
    }
}
