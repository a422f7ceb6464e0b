mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::{MemoryStore, MongoStore, Store};
use crate::services::email_service::EmailService;
use crate::services::gemini_service::{GeminiClient, LanguageModel};
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Invalid configuration");

    log::info!("🚀 Starting Complaint Portal...");

    let store: Arc<dyn Store> = if config.uses_memory_store() {
        log::warn!("⚠️  Using in-memory store, data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        let mongo = MongoStore::connect(&config.database_url)
            .await
            .expect("Failed to connect to MongoDB");
        log::info!("✅ MongoDB connected successfully");
        Arc::new(mongo)
    };

    let model: Arc<dyn LanguageModel> =
        Arc::new(GeminiClient::new(&config.gemini).expect("Failed to build Gemini client"));

    let state = AppState {
        store,
        email: EmailService::from_config(config.smtp.as_ref()),
        model,
        support_email: config.support_email.clone(),
    };
    let state_data = web::Data::new(state);

    let host = config.host.clone();
    let port = config.port;

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Generate OpenAPI specification
    let openapi = api::swagger::ApiDoc::openapi();

    // Start HTTP server
    HttpServer::new(move || {
        let cors = config
            .frontend_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(state_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            .configure(|cfg| api::configure(cfg, config.admin_api_key.clone()))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
