use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::companies::UploadSuppliersForm;
use crate::repository::DieselRepository;
use crate::routes::failure_message;
use crate::services::ServiceError;
use crate::services::suppliers::{CompaniesQuery, backfill_suppliers, load_companies};

#[get("/companies")]
pub async fn show_companies(
    params: web::Query<CompaniesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_companies(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "companies",
                &server_config.auth_service_url,
            );
            context.insert("suppliers", &data.suppliers);
            context.insert("search", &data.search);
            context.insert("search_action", "/companies");
            render_template(&tera, "companies/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list suppliers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/companies/upload")]
pub async fn upload_companies(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadSuppliersForm>,
) -> impl Responder {
    match backfill_suppliers(repo.get_ref(), &user, &mut form) {
        Ok(created) => {
            FlashMessage::success(format!("Suppliers created: {created}.")).send();
            redirect("/companies")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/companies")
        }
        Err(err) => {
            log::error!("Failed to backfill suppliers: {err}");
            FlashMessage::error(failure_message("import suppliers", &err)).send();
            redirect("/companies")
        }
    }
}
