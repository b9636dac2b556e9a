use actix_web::web;
use pushkind_common::routes::logout;

use crate::services::ServiceError;

pub mod api;
pub mod companies;
pub mod control_plan;
pub mod main;
pub mod measurements;

/// Registers every handler that requires an authenticated identity.
pub fn configure_protected(cfg: &mut web::ServiceConfig) {
    cfg.service(main::show_index)
        .service(main::show_dashboard)
        .service(companies::show_companies)
        .service(companies::upload_companies)
        .service(control_plan::show_control_plan)
        .service(control_plan::add_quality_parameter)
        .service(control_plan::edit_quality_parameter)
        .service(measurements::show_new_measurement)
        .service(measurements::add_measurement)
        .service(measurements::show_measurements)
        .service(measurements::edit_measurement)
        .service(measurements::delete_measurement)
        .service(api::api_v1_measurements)
        .service(api::api_v1_quality_parameters)
        .service(api::api_v1_delete_measurement)
        .service(logout);
}

/// Flash text for an unexpected service failure, keeping the backend message.
pub(crate) fn failure_message(action: &str, err: &ServiceError) -> String {
    format!("Failed to {action}: {err}")
}
