use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::measurements::{AddMeasurementForm, DeleteMeasurementForm, EditMeasurementForm};
use crate::repository::DieselRepository;
use crate::routes::failure_message;
use crate::services::ServiceError;
use crate::services::measurements::{
    DeleteOutcome, MeasurementsQuery, create_measurement, load_measurements,
    load_new_measurement_page, modify_measurement, remove_measurement,
};

const CONFLICT_MESSAGE: &str = "This email is already registered to another supplier.";

#[get("/measurements")]
pub async fn show_measurements(
    params: web::Query<MeasurementsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_measurements(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "measurements",
                &server_config.auth_service_url,
            );
            context.insert("supplier", &data.supplier);
            context.insert("measurements", &data.measurements);
            context.insert("parameters", &data.parameters);
            context.insert("filters", &data.query);
            context.insert("filters_query", &data.query.filters_query_string());
            context.insert("list_url", &data.query.list_url());
            context.insert("editing", &data.editing);
            context.insert("confirming_delete", &data.confirming_delete);
            render_template(&tera, "measurements/index.html", &context)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/measurements")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error(CONFLICT_MESSAGE).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list measurements: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/measurements/new")]
pub async fn show_new_measurement(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_new_measurement(
        &repo,
        &user,
        &flash_messages,
        &server_config,
        &tera,
        &AddMeasurementForm::default(),
        None,
    )
}

#[post("/measurements/new")]
pub async fn add_measurement(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<AddMeasurementForm>,
) -> impl Responder {
    let submitted = form.clone();

    let error = match create_measurement(repo.get_ref(), &user, form) {
        Ok(record) => {
            FlashMessage::success(format!(
                "Recorded {} {} for «{}».",
                record.measurement.value, record.parameter.unit, record.parameter.name
            ))
            .send();
            return redirect("/measurements/new");
        }
        Err(ServiceError::Form(message)) => message,
        Err(ServiceError::NotFound) => "The selected quality parameter no longer exists.".to_string(),
        Err(ServiceError::Conflict) => {
            FlashMessage::error(CONFLICT_MESSAGE).send();
            return redirect("/na");
        }
        Err(err) => {
            log::error!("Failed to record measurement: {err}");
            failure_message("record the measurement", &err)
        }
    };

    render_new_measurement(
        &repo,
        &user,
        &flash_messages,
        &server_config,
        &tera,
        &submitted,
        Some(&error),
    )
}

/// Renders the measurement form, keeping whatever the supplier typed.
fn render_new_measurement(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    server_config: &CommonServerConfig,
    tera: &Tera,
    form: &AddMeasurementForm,
    error: Option<&str>,
) -> HttpResponse {
    match load_new_measurement_page(repo, user) {
        Ok(data) => {
            let mut context = base_context(
                flash_messages,
                user,
                "measurements_new",
                &server_config.auth_service_url,
            );
            context.insert("parameters", &data.parameters);
            context.insert("form", form);
            context.insert("form_error", &error);
            render_template(tera, "measurements/new.html", &context)
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error(CONFLICT_MESSAGE).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load measurement form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/measurements/{measurement_id}/edit")]
pub async fn edit_measurement(
    path: web::Path<i32>,
    filters: web::Query<MeasurementsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditMeasurementForm>,
) -> impl Responder {
    let measurement_id = path.into_inner();

    match modify_measurement(repo.get_ref(), &user, measurement_id, form) {
        Ok(measurement) => {
            FlashMessage::success(format!("Measurement updated to {}.", measurement.value)).send();
            redirect(&filters.list_url())
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&filters.edit_url(measurement_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Measurement not found.").send();
            redirect(&filters.list_url())
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error(CONFLICT_MESSAGE).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to update measurement {measurement_id}: {err}");
            FlashMessage::error(failure_message("update the measurement", &err)).send();
            redirect(&filters.list_url())
        }
    }
}

#[post("/measurements/{measurement_id}/delete")]
pub async fn delete_measurement(
    path: web::Path<i32>,
    filters: web::Query<MeasurementsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteMeasurementForm>,
) -> impl Responder {
    let measurement_id = path.into_inner();

    match remove_measurement(repo.get_ref(), &user, measurement_id, form) {
        Ok(DeleteOutcome::Deleted) => {
            FlashMessage::success("Measurement deleted.").send();
            redirect(&filters.list_url())
        }
        Ok(DeleteOutcome::ConfirmationRequired) => {
            redirect(&filters.confirm_delete_url(measurement_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Measurement not found or already deleted.").send();
            redirect(&filters.list_url())
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error(CONFLICT_MESSAGE).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to delete measurement {measurement_id}: {err}");
            FlashMessage::error(failure_message("delete the measurement", &err)).send();
            redirect(&filters.list_url())
        }
    }
}
