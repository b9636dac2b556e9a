pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role allowed to edit the control plan and manage suppliers.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
