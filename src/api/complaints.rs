use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::api::failure;
use crate::services::complaint_service::{self, ComplaintStats};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body(content = serde_json::Value, description = "Complaint form: `type` (Food, Hospital/Healthcare, Hotel) plus sector fields"),
    responses(
        (status = 200, description = "Complaint stored; body carries `complaintId`"),
        (status = 400, description = "Missing or unknown complaint type"),
        (status = 500, description = "Failed to submit complaint")
    )
)]
pub async fn submit_complaint(state: web::Data<AppState>, payload: web::Json<Value>) -> HttpResponse {
    let sector = payload.get("type").and_then(Value::as_str).unwrap_or("?").to_string();
    log::info!("📨 POST /api/complaints - type: {}", sector);

    match complaint_service::submit_complaint(state.store.as_ref(), &state.email, payload.into_inner()).await {
        Ok(complaint_id) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "complaintId": complaint_id
        })),
        Err(e) => {
            log::error!("❌ Complaint submission failed ({}): {}", sector, e);
            failure(&e, "Failed to submit complaint")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/complaints/{user_id}",
    tag = "Complaints",
    params(("user_id" = String, Path, description = "Submitting user")),
    responses(
        (status = 200, description = "User's complaints, oldest first"),
        (status = 500, description = "Failed to fetch complaints")
    )
)]
pub async fn list_complaints(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("📋 GET /api/complaints/{}", user_id);

    match complaint_service::list_for_user(state.store.as_ref(), &user_id).await {
        Ok(complaints) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "complaints": complaints
        })),
        Err(e) => {
            log::error!("❌ Failed to fetch complaints for {}: {}", user_id, e);
            failure(&e, "Failed to fetch complaints")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/complaint/{complaint_id}",
    tag = "Complaints",
    params(("complaint_id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint record"),
        (status = 404, description = "Complaint not found")
    )
)]
pub async fn get_complaint(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let complaint_id = path.into_inner();
    log::info!("🔍 GET /api/complaint/{}", complaint_id);

    match complaint_service::get_complaint(state.store.as_ref(), &complaint_id).await {
        Ok(complaint) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "complaint": complaint
        })),
        Err(e) => failure(&e, "Failed to fetch complaint"),
    }
}

#[utoipa::path(
    get,
    path = "/api/complaints/{user_id}/stats",
    tag = "Complaints",
    params(("user_id" = String, Path, description = "Submitting user")),
    responses(
        (status = 200, description = "Counts by status and sector", body = ComplaintStats)
    )
)]
pub async fn complaint_stats(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("📊 GET /api/complaints/{}/stats", user_id);

    match complaint_service::stats_for_user(state.store.as_ref(), &user_id).await {
        Ok(stats) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "stats": stats
        })),
        Err(e) => {
            log::error!("❌ Failed to compute stats for {}: {}", user_id, e);
            failure(&e, "Failed to fetch complaints")
        }
    }
}
