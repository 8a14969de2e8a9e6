//! Employee roster.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{Employee, EmployeeDraft, EmployeeRecord, ACTIVE_STATUS};
pub use router::employee_router;
pub use service::{EmployeeService, EmployeeServiceError};
