pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod state;
pub mod uploads;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Settings;
pub use db::{create_lazy_pool, create_pool, DbPool};
pub use state::AppState;

use errors::extraction_error;
use openapi::ApiDoc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("applied migration {}", version);
    }
    Ok(())
}

/// Extractor settings and every API route. Malformed bodies, query strings
/// and path segments all answer 400 with the usual `{"error": ...}` body.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| extraction_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| extraction_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| extraction_error(err)))
        .configure(handlers::configure);
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

/// Build and return an actix-web `Server` bound to the configured host and port.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(settings: &Settings, pool: DbPool) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::new(pool, settings));
    let origins = settings.cors_origins.clone();
    let upload_dir = settings.upload_dir.clone();
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&origins))
            .wrap(Logger::default())
            .configure(configure_app)
            .service(Files::new(uploads::PUBLIC_PREFIX, &upload_dir))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((settings.host.as_str(), settings.port))?
    .run())
}
