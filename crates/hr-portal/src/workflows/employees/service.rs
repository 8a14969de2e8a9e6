use std::sync::Arc;

use tracing::info;

use super::domain::{Employee, EmployeeDraft, EmployeeRecord};
use crate::store::{self, paths, RealtimeStore, StoreError};
use crate::workflows::ids::{next_record_id, EmployeeId};
use crate::workflows::validation::ValidationError;

/// Roster CRUD over `employees/{id}`.
pub struct EmployeeService<S> {
    store: Arc<S>,
}

impl<S> EmployeeService<S>
where
    S: RealtimeStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<EmployeeRecord>, EmployeeServiceError> {
        let employees: Vec<(String, Employee)> =
            store::read_collection(&*self.store, paths::EMPLOYEES).await?;
        Ok(employees
            .into_iter()
            .map(|(id, employee)| EmployeeRecord {
                id: EmployeeId(id),
                employee,
            })
            .collect())
    }

    pub async fn get(&self, id: &EmployeeId) -> Result<EmployeeRecord, EmployeeServiceError> {
        let employee = self.load(id).await?;
        Ok(EmployeeRecord {
            id: id.clone(),
            employee,
        })
    }

    pub async fn create(&self, draft: EmployeeDraft) -> Result<EmployeeRecord, EmployeeServiceError> {
        let employee = draft.into_employee()?;
        let id = EmployeeId(next_record_id("emp"));
        store::write(&*self.store, &paths::employee(id.as_str()), &employee).await?;
        info!(employee = %id, department = %employee.department, "employee added");
        Ok(EmployeeRecord { id, employee })
    }

    pub async fn update(
        &self,
        id: &EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<EmployeeRecord, EmployeeServiceError> {
        let employee = draft.into_employee()?;
        self.load(id).await?;
        store::write(&*self.store, &paths::employee(id.as_str()), &employee).await?;
        info!(employee = %id, "employee updated");
        Ok(EmployeeRecord {
            id: id.clone(),
            employee,
        })
    }

    pub async fn delete(&self, id: &EmployeeId) -> Result<(), EmployeeServiceError> {
        self.load(id).await?;
        self.store.remove(&paths::employee(id.as_str())).await?;
        info!(employee = %id, "employee removed");
        Ok(())
    }

    async fn load(&self, id: &EmployeeId) -> Result<Employee, EmployeeServiceError> {
        paths::validate_key(id.as_str())?;
        store::read(&*self.store, &paths::employee(id.as_str()))
            .await?
            .ok_or_else(|| EmployeeServiceError::NotFound(id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmployeeServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("employee '{0}' not found")]
    NotFound(EmployeeId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRealtimeStore;

    fn draft(name: &str) -> EmployeeDraft {
        EmployeeDraft {
            name: name.to_string(),
            email: "staff@example.test".to_string(),
            department: "Operations".to_string(),
            position: "Coordinator".to_string(),
            salary_grade: 28_000.0,
            ..EmployeeDraft::default()
        }
    }

    #[tokio::test]
    async fn crud_cycle() {
        let service = EmployeeService::new(Arc::new(InMemoryRealtimeStore::new()));

        let created = service.create(draft("Lea")).await.expect("created");
        assert!(created.id.as_str().starts_with("emp_"));

        let updated = service
            .update(&created.id, draft("Lea Cruz"))
            .await
            .expect("updated");
        assert_eq!(updated.employee.name, "Lea Cruz");
        assert_eq!(service.list().await.expect("list").len(), 1);

        service.delete(&created.id).await.expect("deleted");
        assert!(matches!(
            service.get(&created.id).await,
            Err(EmployeeServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_validates_before_lookup() {
        let service = EmployeeService::new(Arc::new(InMemoryRealtimeStore::new()));
        let result = service
            .update(&EmployeeId::from("emp_missing"), draft(""))
            .await;
        assert!(matches!(result, Err(EmployeeServiceError::Validation(_))));
    }
}
