//! Dashboard pipeline: validate, fetch, compute

mod dashboard;
mod state;

pub use dashboard::Dashboard;
pub use state::{AppState, DashboardData, DashboardRequest};
