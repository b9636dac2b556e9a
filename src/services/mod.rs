pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod control_plan;
pub mod dashboard;
pub mod measurements;
pub mod suppliers;
