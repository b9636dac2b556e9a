use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::measurements::DeleteMeasurementForm;
use crate::repository::DieselRepository;
use crate::services::measurements::{MeasurementsQuery, list_measurements, remove_measurement};
use crate::services::{ServiceError, control_plan};

#[get("/api/v1/measurements")]
/// Return the caller's measurements as JSON, honouring the list filters.
///
/// Rows of other suppliers are never included.
pub async fn api_v1_measurements(
    params: web::Query<MeasurementsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_measurements(repo.get_ref(), &user, &params) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(ServiceError::Conflict) => HttpResponse::Conflict().finish(),
        Err(err) => {
            log::error!("Failed to list measurements: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/api/v1/quality-parameters")]
/// Return the whole control plan as JSON.
pub async fn api_v1_quality_parameters(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match control_plan::list_quality_parameters(repo.get_ref()) {
        Ok(parameters) => HttpResponse::Ok().json(parameters),
        Err(err) => {
            log::error!("Failed to list quality parameters: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/api/v1/measurements/{measurement_id}/delete")]
/// Delete one of the caller's measurements. Foreign rows answer `404 Not Found`.
pub async fn api_v1_delete_measurement(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let measurement_id = path.into_inner();
    let form = DeleteMeasurementForm { confirmed: true };

    match remove_measurement(repo.get_ref(), &user, measurement_id, form) {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Conflict) => HttpResponse::Conflict().finish(),
        Err(err) => {
            log::error!("Failed to delete measurement {measurement_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
