use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::not_assigned;
use tera::Tera;

use supplier_quality::repository::DieselRepository;
use supplier_quality::routes::configure_protected;
use supplier_quality::routes::main::login;

/// Process settings read from the environment.
struct Settings {
    database_url: String,
    address: String,
    port: u16,
    domain: String,
    secret: Option<String>,
    auth_service_url: String,
}

impl Settings {
    fn from_env() -> Result<Self, String> {
        let auth_service_url = env::var("AUTH_SERVICE_URL")
            .map_err(|_| "AUTH_SERVICE_URL environment variable not set".to_string())?;

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| format!("PORT `{value}` is not a valid port number"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "app.db".to_string()),
            address: env::var("ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            domain: env::var("DOMAIN").unwrap_or_else(|_| "localhost".to_string()),
            secret: env::var("SECRET_KEY").ok(),
            auth_service_url,
        })
    }

    fn session_key(&self) -> Key {
        match &self.secret {
            Some(secret) => Key::from(secret.as_bytes()),
            None => {
                log::warn!("SECRET_KEY not set, sessions will not survive a restart");
                Key::generate()
            }
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(message) => {
            log::error!("{message}");
            std::process::exit(1);
        }
    };

    let secret_key = settings.session_key();
    let common_config = CommonServerConfig {
        secret: settings.secret.clone().unwrap_or_default(),
        auth_service_url: settings.auth_service_url.clone(),
    };

    let pool = match establish_connection_pool(&settings.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to open database {}: {e}", settings.database_url);
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new("templates/**/*") {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to load templates: {e}");
            std::process::exit(1);
        }
    };

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();
    let cookie_domain = format!(".{}", settings.domain);

    log::info!(
        "Starting supplier quality service on {}:{}",
        settings.address,
        settings.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .cookie_domain(Some(cookie_domain.clone()))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(login)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .configure(configure_protected),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((settings.address, settings.port))?
    .run()
    .await
}
