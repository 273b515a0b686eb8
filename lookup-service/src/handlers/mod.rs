pub mod health;
pub mod lookup;

pub use health::{health_check, metrics_endpoint, readiness_check, OpsState};
pub use lookup::get_document;
