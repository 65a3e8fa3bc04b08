mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::database::{IdentityStore, MongoDB};
use crate::services::TokenService;
use crate::utils::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    log::info!("🚀 Starting TutorHub service...");
    log::info!("📊 Database: {} ({})", config.mongodb_uri, config.mongodb_database);

    // Initialize MongoDB connection
    let db = MongoDB::new(&config.mongodb_uri, &config.mongodb_database)
        .await
        .map_err(|e| {
            log::error!("❌ MongoDB connection error: {}", e);
            std::io::Error::other(e)
        })?;
    log::info!("✅ MongoDB connected successfully");

    let store: Arc<dyn IdentityStore> = Arc::new(db.clone());
    let store_data = web::Data::from(store);
    let tokens_data = web::Data::new(TokenService::new(&config.jwt_secret));
    let config_data = web::Data::new(config.clone());

    let bind = (config.host.clone(), config.port);
    log::info!("🌐 Server starting on {}:{}", bind.0, bind.1);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", bind.0, bind.1);

    let cors_origins = config.cors_origins.clone();

    // Start HTTP server
    let result = HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(store_data.clone())
            .app_data(tokens_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::swagger::ApiDoc::openapi()),
            )
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await;

    log::info!("🛑 Server stopped, closing MongoDB connection");
    db.shutdown().await;

    result
}
