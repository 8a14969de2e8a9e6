//! HR dashboard totals and chart data.

pub mod charts;
pub mod router;
pub mod service;
pub mod views;


pub use router::dashboard_router;
pub use service::DashboardService;
pub use views::{
    DashboardSnapshot, DashboardTotals, EmployeeSkillBar, PositionHeadcount, PositionSkills,
    SalarySlice,
};
