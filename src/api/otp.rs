use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::email_service::DeliveryMethod;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
    /// 4 to 8 digits, generated by the client
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SendOtpResponse {
    pub success: bool,
    pub method: DeliveryMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn is_valid_otp(otp: &str) -> bool {
    (4..=8).contains(&otp.len()) && otp.bytes().all(|b| b.is_ascii_digit())
}

#[utoipa::path(
    post,
    path = "/api/send-otp",
    tag = "Notifications",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP delivered by SMTP or logged by the mock mailer", body = SendOtpResponse),
        (status = 400, description = "Missing email or malformed OTP"),
        (status = 500, description = "Both delivery paths failed")
    )
)]
pub async fn send_otp(state: web::Data<AppState>, request: web::Json<SendOtpRequest>) -> HttpResponse {
    let email = request.email.trim();
    log::info!("🔑 POST /api/send-otp - email: {}", email);

    if email.is_empty() || !is_valid_otp(request.otp.trim()) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "A valid email and a 4-8 digit OTP are required"
        }));
    }

    match state.email.send_otp(email, request.otp.trim()).await {
        Ok(DeliveryMethod::Email) => HttpResponse::Ok().json(SendOtpResponse {
            success: true,
            method: DeliveryMethod::Email,
            message: None,
        }),
        Ok(DeliveryMethod::Mock) => HttpResponse::Ok().json(SendOtpResponse {
            success: true,
            method: DeliveryMethod::Mock,
            message: Some("OTP sent via mock service (check console logs)".to_string()),
        }),
        Err(e) => {
            log::error!("❌ OTP delivery failed for {}: {}", email, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to send OTP. Please try again."
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{init_app, Harness, RecordingMailer, StubModel};
    use actix_web::{http::StatusCode, test as actix_test};
    use serde_json::{json, Value};

    #[test]
    fn test_otp_format() {
        assert!(is_valid_otp("1234"));
        assert!(is_valid_otp("12345678"));
        assert!(!is_valid_otp("123"));
        assert!(!is_valid_otp("123456789"));
        assert!(!is_valid_otp("12a4"));
    }

    #[actix_web::test]
    async fn test_otp_sent_by_smtp() {
        let harness = Harness::new(StubModel::failing());
        let app = init_app!(harness.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({"email": "ana@example.com", "otp": "482913"}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["method"], "email");

        let sent = harness.primary_mail.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("482913"));
    }

    #[actix_web::test]
    async fn test_otp_falls_back_to_mock() {
        let harness = Harness::with_mailers(
            StubModel::failing(),
            RecordingMailer::failing(),
            RecordingMailer::new(),
        );
        let app = init_app!(harness.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({"email": "ana@example.com", "otp": "4829"}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["method"], "mock");
        let sent = harness.fallback_mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].summary, "OTP: 4829");
    }

    #[actix_web::test]
    async fn test_otp_total_failure_is_500() {
        let harness = Harness::with_mailers(
            StubModel::failing(),
            RecordingMailer::failing(),
            RecordingMailer::failing(),
        );
        let app = init_app!(harness.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({"email": "ana@example.com", "otp": "4829"}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to send OTP. Please try again.");
    }

    #[actix_web::test]
    async fn test_otp_rejects_bad_input() {
        let harness = Harness::new(StubModel::failing());
        let app = init_app!(harness.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/api/send-otp")
            .set_json(json!({"email": "ana@example.com", "otp": "12"}))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        assert!(harness.primary_mail.sent().is_empty());
    }
}
