pub mod admin;
pub mod auth;
pub mod chat;
pub mod complaints;
pub mod contact;
pub mod health;
pub mod otp;
pub mod swagger;
pub mod users;

use actix_web::{error::InternalError, web, HttpResponse, ResponseError};

use crate::middleware::AdminAuth;
use crate::utils::AppError;

/// Registers every route. Shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig, admin_api_key: Option<String>) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                // Auth
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                // Profile
                .route("/users/{user_id}", web::get().to(users::get_user))
                .route("/users/{user_id}", web::put().to(users::update_user))
                // Complaints
                .route("/complaints", web::post().to(complaints::submit_complaint))
                .route("/complaints/{user_id}", web::get().to(complaints::list_complaints))
                .route("/complaints/{user_id}/stats", web::get().to(complaints::complaint_stats))
                .route("/complaint/{complaint_id}", web::get().to(complaints::get_complaint))
                // Notifications
                .route("/send-otp", web::post().to(otp::send_otp))
                .route("/contact", web::post().to(contact::submit_contact))
                // Assistant
                .route("/chat", web::post().to(chat::chat))
                .route("/gemini-chat", web::post().to(chat::chat))
                // Admin (bearer key)
                .service(
                    web::scope("/admin")
                        .wrap(AdminAuth::new(admin_api_key))
                        .route(
                            "/complaints/{complaint_id}/status",
                            web::patch().to(admin::update_complaint_status),
                        ),
                ),
        );
}

/// Malformed or mistyped JSON bodies get the usual `{ success, error }` envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, req| {
            log::warn!("❌ Rejected body for {}: {}", req.path(), err);
            let response = HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Invalid JSON body: {}", err)
            }));
            InternalError::from_response(err, response).into()
        })
}

/// Client errors keep their own message; server-side failures are reported
/// with the endpoint's generic text.
pub(crate) fn failure(error: &AppError, server_message: &str) -> HttpResponse {
    let status = error.status_code();
    if status.is_server_error() {
        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": server_message
        }))
    } else {
        error.error_response()
    }
}
