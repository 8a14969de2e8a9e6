use std::sync::Arc;

use tracing::warn;

use super::charts;
use super::views::DashboardSnapshot;
use crate::store::{self, paths, RealtimeStore, StoreError};
use crate::workflows::employees::Employee;
use crate::workflows::jobs::JobPosting;

/// HR dashboard aggregates. Each section loads on its own; a failed read leaves that section
/// empty and reports the failure alongside the data that did load.
pub struct DashboardService<S> {
    store: Arc<S>,
}

impl<S> DashboardService<S>
where
    S: RealtimeStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let mut snapshot = DashboardSnapshot::default();

        let employees: Vec<Employee> = match self.section(paths::EMPLOYEES).await {
            Ok(employees) => employees,
            Err(err) => {
                warn!(error = %err, "dashboard employees unavailable");
                snapshot
                    .errors
                    .insert("employees", "Failed to load employees.".to_string());
                Vec::new()
            }
        };
        let jobs: Vec<JobPosting> = match self.section(paths::JOBS).await {
            Ok(jobs) => jobs,
            Err(err) => {
                warn!(error = %err, "dashboard jobs unavailable");
                snapshot
                    .errors
                    .insert("jobs", "Failed to load jobs.".to_string());
                Vec::new()
            }
        };

        snapshot.totals = charts::totals(&employees, &jobs);
        snapshot.salary_by_gender = charts::salary_by_gender(&employees);
        snapshot.headcount_by_position = charts::headcount_by_position(&employees);
        snapshot.skills_by_position = charts::skills_by_position(&employees);
        snapshot.skills_per_employee = charts::skills_per_employee(&employees);
        snapshot
    }

    async fn section<T>(&self, path: &str) -> Result<Vec<T>, StoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        let records: Vec<(String, T)> = store::read_collection(&*self.store, path).await?;
        Ok(records.into_iter().map(|(_, record)| record).collect())
    }
}
