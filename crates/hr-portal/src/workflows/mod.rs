//! Portal workflows and their HTTP routers.

pub mod applications;
pub mod dashboard;
pub mod employees;
pub(crate) mod http;
pub mod ids;
pub mod jobs;
pub mod profiles;
pub mod skills;
pub mod validation;

use std::sync::Arc;

use axum::Router;

use crate::store::{BlobStore, RealtimeStore};
use applications::{application_router, ApplicationWorkflow, WriteStrategy};
use dashboard::{dashboard_router, DashboardService};
use employees::{employee_router, EmployeeService};
use jobs::{job_router, JobService};
use profiles::{profile_router, ProfileService};

/// Every workflow service wired to one realtime store and one blob store.
pub struct Portal<S, B> {
    pub profiles: Arc<ProfileService<S, B>>,
    pub jobs: Arc<JobService<S>>,
    pub employees: Arc<EmployeeService<S>>,
    pub applications: Arc<ApplicationWorkflow<S>>,
    pub dashboard: Arc<DashboardService<S>>,
}

impl<S, B> Portal<S, B>
where
    S: RealtimeStore + 'static,
    B: BlobStore + 'static,
{
    pub fn new(store: Arc<S>, blobs: Arc<B>, strategy: WriteStrategy) -> Self {
        Self {
            profiles: Arc::new(ProfileService::new(store.clone(), blobs)),
            jobs: Arc::new(JobService::new(store.clone())),
            employees: Arc::new(EmployeeService::new(store.clone())),
            applications: Arc::new(ApplicationWorkflow::new(store.clone(), strategy)),
            dashboard: Arc::new(DashboardService::new(store)),
        }
    }

    /// All `/api/v1` routes.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(profile_router(self.profiles.clone()))
            .merge(job_router(self.jobs.clone()))
            .merge(employee_router(self.employees.clone()))
            .merge(application_router(self.applications.clone()))
            .merge(dashboard_router(self.dashboard.clone()))
    }
}
