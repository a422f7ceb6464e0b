use actix_web::{web, HttpResponse};

use crate::api::failure;
use crate::models::{ProfileUpdate, UserInfo};
use crate::services::auth_service;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User profile", body = UserInfo),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("👤 GET /api/users/{}", user_id);

    match auth_service::get_profile(state.store.as_ref(), &user_id).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": user
        })),
        Err(e) => failure(&e, "Internal server error"),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile", body = UserInfo),
        (status = 400, description = "Nothing to update"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    update: web::Json<ProfileUpdate>,
) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("✏️  PUT /api/users/{}", user_id);

    match auth_service::update_profile(state.store.as_ref(), &user_id, &update).await {
        Ok(user) => {
            log::info!("✅ Profile updated: {}", user_id);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "user": user
            }))
        }
        Err(e) => {
            log::warn!("❌ Profile update failed for {}: {}", user_id, e);
            failure(&e, "Failed to update profile")
        }
    }
}
