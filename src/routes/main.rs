use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::services::{ServiceError, dashboard};

#[get("/")]
pub async fn show_index() -> impl Responder {
    redirect("/dashboard")
}

#[get("/login")]
/// Sign-in is handled by the auth service.
pub async fn login(server_config: web::Data<CommonServerConfig>) -> impl Responder {
    redirect(&server_config.auth_service_url)
}

#[get("/dashboard")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match dashboard::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "dashboard",
                &server_config.auth_service_url,
            );
            context.insert("supplier", &data.supplier);
            context.insert("measurement_count", &data.measurement_count);
            context.insert("outside_limits_count", &data.outside_limits_count);
            context.insert("parameter_count", &data.parameter_count);
            context.insert("recent", &data.recent);
            render_template(&tera, "main/dashboard.html", &context)
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("This email is already registered to another supplier.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
