use crate::error::StoreError;
use crate::models::{Employee, EmployeeDraft, StoredRecord};
use crate::storage::EmployeeStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Employee operations shared by the form pages and the JSON API.
///
/// Every call re-reads the store; nothing is cached between requests.
/// Stored elements that are not readable employees are skipped by lookups and
/// written back as they were.
/// Mutations hold `write_lock` across their read-modify-write so two
/// concurrent updates cannot overwrite each other.
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    write_lock: Mutex<()>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> Vec<Employee> {
        self.store
            .read()
            .await
            .into_iter()
            .filter_map(StoredRecord::into_employee)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Employee> {
        self.list().await.into_iter().find(|e| e.id.matches(id))
    }

    pub async fn create(&self, draft: EmployeeDraft) -> Result<Employee, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read().await;

        let employee = Employee::new(draft);
        records.push(employee.clone().into());
        self.store.write(&records).await?;

        info!(id = %employee.id, name = %employee.name, "Created employee");
        Ok(employee)
    }

    /// Returns `Ok(None)` when no employee has this id; nothing is written then.
    pub async fn update(
        &self,
        id: &str,
        draft: EmployeeDraft,
    ) -> Result<Option<Employee>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read().await;

        let Some(employee) = records
            .iter_mut()
            .filter_map(StoredRecord::as_employee_mut)
            .find(|e| e.id.matches(id))
        else {
            return Ok(None);
        };
        employee.apply(draft);
        let updated = employee.clone();
        self.store.write(&records).await?;

        info!(id = %updated.id, "Updated employee");
        Ok(Some(updated))
    }

    /// Removes the employee if present. Returns whether anything was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read().await;

        let before = records.len();
        records.retain(|r| !r.as_employee().is_some_and(|e| e.id.matches(id)));
        let removed = records.len() != before;
        self.store.write(&records).await?;

        if removed {
            info!(id = %id, "Deleted employee");
        }
        Ok(removed)
    }
}
