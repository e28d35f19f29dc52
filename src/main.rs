use dotenvy::dotenv;
use storefront_service::{build_server, build_state, create_pool, run_migrations, AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = create_pool(&config.database_url, config.pool_size).map_err(std::io::Error::other)?;
    run_migrations(&pool).map_err(std::io::Error::other)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(build_state(pool, &config), &config.host, config.port)?.await
}
