use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::failure;
use crate::services::complaint_service;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusUpdateRequest {
    /// Pending, In Progress, Resolved or Rejected
    #[serde(default)]
    pub status: String,
}

#[utoipa::path(
    patch,
    path = "/api/admin/complaints/{complaint_id}/status",
    tag = "Admin",
    params(("complaint_id" = String, Path, description = "Complaint identifier")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status changed; submitter notified by email"),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Missing or wrong admin key"),
        (status = 404, description = "Complaint not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_complaint_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<StatusUpdateRequest>,
) -> HttpResponse {
    let complaint_id = path.into_inner();
    log::info!("🛠️  PATCH /api/admin/complaints/{}/status -> {}", complaint_id, request.status);

    match complaint_service::update_status(
        state.store.as_ref(),
        &state.email,
        &complaint_id,
        &request.status,
    )
    .await
    {
        Ok(complaint) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "complaint": complaint
        })),
        Err(e) => {
            log::warn!("❌ Status update failed for {}: {}", complaint_id, e);
            failure(&e, "Failed to update complaint")
        }
    }
}
