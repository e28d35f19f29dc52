pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::checkout_service::CheckoutPolicy;
pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use handlers::AppState;

use errors::AppError;
use handlers::ApiDoc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Wires the services for `config` on top of `pool`.
pub fn build_state(pool: DbPool, config: &AppConfig) -> AppState {
    AppState::new(
        pool,
        CheckoutPolicy {
            cash_on_delivery_method_id: config.cash_on_delivery_method_id,
            redirect: config.checkout_redirect.clone(),
        },
    )
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err: error::PathError, _req| AppError::BadRequest(err.to_string()).into())
}

/// Registers every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{cart, catalog, coupons, orders, products};

    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(orders::checkout))
            .route("", web::get().to(orders::list_orders))
            .route("/{id}", web::get().to(orders::get_order)),
    )
    .service(
        web::scope("/cart")
            .route("", web::get().to(cart::get_cart))
            .route("", web::post().to(cart::add_to_cart))
            .route("/lines/{lineId}", web::put().to(cart::update_line))
            .route("/lines/{lineId}", web::delete().to(cart::remove_line)),
    )
    .service(
        web::scope("/coupons")
            .route("", web::post().to(coupons::create_coupon))
            .route("/apply", web::post().to(coupons::apply_coupon)),
    )
    .service(
        web::scope("/catalog")
            .route("/{kind}", web::get().to(catalog::list_lookups))
            .route("/{kind}", web::post().to(catalog::create_lookup))
            .route("/{kind}/{id}", web::put().to(catalog::update_lookup))
            .route("/{kind}/{id}", web::delete().to(catalog::delete_lookup)),
    )
    .service(
        web::scope("/products")
            .route("", web::get().to(products::search_products))
            .route("", web::post().to(products::create_product))
            .route(
                "/variants/{id}/price",
                web::put().to(products::update_variant_price),
            )
            .route("/{id}", web::get().to(products::get_product)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
