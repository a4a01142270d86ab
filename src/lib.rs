pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    info(title = "USB-R-US", description = "USB cable shop: catalog, cart and checkout"),
    paths(
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::list_connectors,
        handlers::reviews::list_reviews,
        handlers::reviews::submit_review,
        handlers::users::register,
        handlers::users::login,
        handlers::cart::view_cart,
        handlers::cart::add_to_cart,
        handlers::cart::remove_from_cart,
        handlers::checkout::checkout_preview,
        handlers::checkout::place_order,
        handlers::orders::order_history,
        handlers::orders::list_orders,
        handlers::admin::create_product,
        handlers::admin::update_product,
        handlers::admin::delete_product,
        handlers::admin::create_connector,
    ),
    tags(
        (name = "catalog"),
        (name = "reviews"),
        (name = "users"),
        (name = "cart"),
        (name = "checkout"),
        (name = "orders"),
        (name = "admin"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Register every route on an actix `ServiceConfig`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    use handlers::{admin, cart, checkout, orders, products, reviews, users};

    cfg.service(
        web::scope("/products")
            .route("", web::get().to(products::list_products))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}/reviews", web::get().to(reviews::list_reviews))
            .route("/{id}/reviews", web::post().to(reviews::submit_review)),
    )
    .route("/connectors", web::get().to(products::list_connectors))
    .service(
        web::scope("/users")
            .route("/register", web::post().to(users::register))
            .route("/login", web::post().to(users::login)),
    )
    .service(
        web::scope("/cart")
            .route("", web::get().to(cart::view_cart))
            .route("/items", web::post().to(cart::add_to_cart))
            .route("/items/{product_id}", web::delete().to(cart::remove_from_cart)),
    )
    .service(
        web::resource("/checkout")
            .route(web::get().to(checkout::checkout_preview))
            .route(web::post().to(checkout::place_order)),
    )
    .route("/orders", web::get().to(orders::order_history))
    .service(
        web::scope("/admin")
            .route("/products", web::post().to(admin::create_product))
            .route("/products/{id}", web::patch().to(admin::update_product))
            .route("/products/{id}", web::delete().to(admin::delete_product))
            .route("/connectors", web::post().to(admin::create_connector))
            .route("/orders", web::get().to(orders::list_orders)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::new(pool));
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
