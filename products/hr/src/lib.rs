//! Employee records service.
//!
//! Sits between the HTTP handlers and [`EmployeeStore`]. The only rule it
//! enforces is that no two employees are created with the same email. The
//! check and the insert are separate queries, so two concurrent creates for
//! the same address can both succeed.

use platform_db::{DbError, EmployeeStore};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use entity::employees::{EmployeeFields, Model as Employee};

#[derive(Debug, Error)]
pub enum HrError {
    #[error("an employee with email {0} already exists")]
    EmailTaken(String),
    #[error("employee {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Store(DbError),
}

impl From<DbError> for HrError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::NotFound(id) => HrError::NotFound(id),
            other => HrError::Store(other),
        }
    }
}

pub type HrResult<T> = Result<T, HrError>;

#[derive(Clone, Debug)]
pub struct EmployeeService {
    store: EmployeeStore,
}

impl EmployeeService {
    pub fn new(store: EmployeeStore) -> Self {
        Self { store }
    }

    #[instrument(name = "hr.save_employee", skip_all)]
    pub async fn save_employee(&self, candidate: EmployeeFields) -> HrResult<Employee> {
        if self.store.find_by_email(&candidate.email).await?.is_some() {
            warn!("rejected employee with duplicate email");
            return Err(HrError::EmailTaken(candidate.email));
        }
        let saved = self.store.insert(candidate).await?;
        info!(id = saved.id, "employee created");
        Ok(saved)
    }

    #[instrument(name = "hr.get_all_employees", skip_all)]
    pub async fn get_all_employees(&self) -> HrResult<Vec<Employee>> {
        Ok(self.store.find_all().await?)
    }

    #[instrument(name = "hr.get_employee_by_id", skip(self))]
    pub async fn get_employee_by_id(&self, id: i64) -> HrResult<Option<Employee>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Like [`Self::get_employee_by_id`], but absence is an error.
    #[instrument(name = "hr.require_employee", skip(self))]
    pub async fn require_employee(&self, id: i64) -> HrResult<Employee> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(HrError::NotFound(id))
    }

    #[instrument(name = "hr.find_employee_by_name", skip_all)]
    pub async fn find_employee_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> HrResult<Option<Employee>> {
        Ok(self.store.find_by_name(first_name, last_name).await?)
    }

    /// Persist a record whose fields were already merged onto a fetched employee.
    #[instrument(name = "hr.update_employee", skip_all, fields(id = employee.id))]
    pub async fn update_employee(&self, employee: Employee) -> HrResult<Employee> {
        let updated = self.store.save(employee).await?;
        info!("employee updated");
        Ok(updated)
    }

    #[instrument(name = "hr.delete_employee", skip(self))]
    pub async fn delete_employee(&self, id: i64) -> HrResult<()> {
        self.store.delete_by_id(id).await?;
        info!("employee deleted");
        Ok(())
    }

    pub async fn employee_count(&self) -> HrResult<u64> {
        Ok(self.store.count().await?)
    }
}
