use dotenvy::dotenv;
use std::io;
use usb_r_us::application::UserService;
use usb_r_us::config::Config;
use usb_r_us::infrastructure::DieselUserRepository;
use usb_r_us::{build_server, create_pool, run_migrations, DbPool};

fn bootstrap_admin(pool: &DbPool, config: &Config) {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return;
    };
    let users = UserService::new(DieselUserRepository::new(pool.clone()));
    if let Err(e) = users.ensure_admin(email, password) {
        log::error!("Could not create bootstrap admin {}: {}", email, e);
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url, config.db_pool_size)
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    run_migrations(&pool).map_err(io::Error::other)?;
    bootstrap_admin(&pool, &config);

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(pool, &config.host, config.port)?.await
}
