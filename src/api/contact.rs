use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::models::ContactMessage;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Notifications",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message accepted"),
        (status = 400, description = "Malformed JSON")
    )
)]
pub async fn submit_contact(
    state: web::Data<AppState>,
    request: web::Json<ContactRequest>,
) -> HttpResponse {
    log::info!("✉️  POST /api/contact - from: {}", request.email);

    let request = request.into_inner();
    let message = ContactMessage {
        id: ObjectId::new().to_hex(),
        name: request.name,
        email: request.email,
        subject: request.subject,
        message: request.message,
        created_at: Utc::now().to_rfc3339(),
    };

    if let Err(e) = state.store.insert_contact_message(&message).await {
        log::warn!("⚠️  Contact message not persisted: {}", e);
    }

    if let Err(e) = state.email.send_contact_message(&state.support_email, &message).await {
        log::warn!("⚠️  Contact message not delivered: {}", e);
    }

    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{init_app, Harness, RecordingMailer, StubModel};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_contact_is_stored_and_mailed_to_support() {
        let harness = Harness::new(StubModel::failing());
        let app = init_app!(harness.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({
                "name": "Ana",
                "email": "ana@example.com",
                "subject": "Billing",
                "message": "I was charged twice"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        let stored = harness.store.contact_messages().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].subject, "Billing");

        let sent = harness.primary_mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "support@example.com");
        assert_eq!(sent[0].subject, "Contact Form: Billing");
    }

    #[actix_web::test]
    async fn test_contact_succeeds_when_delivery_fails() {
        let harness = Harness::with_mailers(
            StubModel::failing(),
            RecordingMailer::failing(),
            RecordingMailer::failing(),
        );
        let app = init_app!(harness.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({"name": "Ana"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(harness.store.contact_messages().await.len(), 1);
    }
}
