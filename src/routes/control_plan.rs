use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::control_plan::{AddQualityParameterForm, EditQualityParameterForm};
use crate::repository::DieselRepository;
use crate::routes::failure_message;
use crate::services::ServiceError;
use crate::services::control_plan::{
    ControlPlanQuery, create_quality_parameter, load_control_plan, modify_quality_parameter,
};

#[get("/control-plan")]
pub async fn show_control_plan(
    params: web::Query<ControlPlanQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_control_plan(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "control_plan",
                &server_config.auth_service_url,
            );
            context.insert("parameters", &data.parameters);
            context.insert("search", &data.search);
            context.insert("search_action", "/control-plan");
            context.insert("can_edit", &data.can_edit);
            render_template(&tera, "control_plan/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list quality parameters: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/control-plan/add")]
pub async fn add_quality_parameter(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddQualityParameterForm>,
) -> impl Responder {
    match create_quality_parameter(repo.get_ref(), &user, form) {
        Ok(parameter) => {
            FlashMessage::success(format!("Parameter «{}» added.", parameter.name)).send();
            redirect("/control-plan")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/control-plan")
        }
        Err(err) => {
            log::error!("Failed to create quality parameter: {err}");
            FlashMessage::error(failure_message("add the parameter", &err)).send();
            redirect("/control-plan")
        }
    }
}

#[post("/control-plan/edit")]
pub async fn edit_quality_parameter(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditQualityParameterForm>,
) -> impl Responder {
    match modify_quality_parameter(repo.get_ref(), &user, form) {
        Ok(parameter) => {
            FlashMessage::success(format!("Parameter «{}» updated.", parameter.name)).send();
            redirect("/control-plan")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/control-plan")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Parameter not found.").send();
            redirect("/control-plan")
        }
        Err(err) => {
            log::error!("Failed to update quality parameter: {err}");
            FlashMessage::error(failure_message("update the parameter", &err)).send();
            redirect("/control-plan")
        }
    }
}
