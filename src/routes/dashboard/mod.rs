mod handler;
mod model;

pub use handler::get_dashboard;
pub use model::{Activity, ActivityKind, DashboardSummary, recent_activities};
