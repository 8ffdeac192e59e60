use std::io;

use catalogue_service::application::AuthService;
use catalogue_service::auth::{PasswordHasher, TokenService};
use catalogue_service::infrastructure::DieselUserRepository;
use catalogue_service::{build_server, create_pool, run_migrations, DbPool, Settings};
use dotenvy::dotenv;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

/// Creates or promotes the configured admin account, if any.
fn bootstrap_admin(settings: &Settings, pool: &DbPool) -> io::Result<()> {
    let Some(admin) = &settings.admin else {
        return Ok(());
    };

    let auth = AuthService::new(
        DieselUserRepository::new(pool.clone()),
        PasswordHasher::new(settings.bcrypt_cost),
        TokenService::new(&settings.jwt_secret, settings.access_token_minutes),
    );
    let user = auth
        .ensure_admin(&admin.name, &admin.email, &admin.password)
        .map_err(|e| startup_error("Failed to bootstrap the admin account", e))?;
    log::info!("admin account ready: {} (id {})", user.email, user.id);
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let pool = create_pool(&settings.database_url)
        .map_err(|e| startup_error("Failed to create the database pool", e))?;
    run_migrations(&pool).map_err(|e| startup_error("Failed to run database migrations", e))?;
    bootstrap_admin(&settings, &pool)?;

    std::fs::create_dir_all(&settings.upload_dir)?;

    log::info!("Starting server at http://{}:{}", settings.host, settings.port);

    build_server(&settings, pool)?.await
}
