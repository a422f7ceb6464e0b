use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::services::assistant_service::{self, AssistantReply};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "Assistant",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply from stored data, the model or a canned fallback", body = AssistantReply),
        (status = 400, description = "Empty message")
    )
)]
pub async fn chat(state: web::Data<AppState>, request: web::Json<ChatRequest>) -> HttpResponse {
    let message = request.message.trim();
    log::info!(
        "💬 POST /api/chat - user: {}",
        request.user_id.as_deref().unwrap_or("anonymous")
    );

    if message.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Message is required"
        }));
    }

    let reply = assistant_service::respond(
        state.store.as_ref(),
        state.model.as_ref(),
        message,
        request.user_id.as_deref(),
    )
    .await;

    log::info!("✅ Assistant replied ({:?})", reply.source);

    let mut body = serde_json::json!({
        "success": true,
        "response": reply.response,
        "source": reply.source,
    });
    if let Some(summaries) = reply.summaries {
        body["summaries"] = serde_json::json!(summaries);
    }

    HttpResponse::Ok().json(body)
}

#[cfg(test)]
mod tests {
    use crate::services::assistant_service::NO_COMPLAINTS_MESSAGE;
    use crate::test_support::{init_app, Harness, StubModel};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_tracking_query_for_user_without_complaints() {
        let harness = Harness::new(StubModel::replying("unused"));
        let app = init_app!(harness.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({"message": "track my complaints", "userId": "u1"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["source"], "data");
        assert_eq!(body["response"], NO_COMPLAINTS_MESSAGE);
        assert!(harness.model.prompts().is_empty());
    }

    #[actix_web::test]
    async fn test_model_failure_still_answers_on_legacy_route() {
        let harness = Harness::new(StubModel::failing());
        let app = init_app!(harness.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/gemini-chat")
            .set_json(json!({"message": "What types of complaints can I file?"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["source"], "fallback");
        assert!(body["response"].as_str().unwrap().contains("Hotel"));
        assert!(body.get("summaries").is_none());
    }

    #[actix_web::test]
    async fn test_model_reply_includes_summaries() {
        let harness = Harness::new(StubModel::replying(
            "1. Type: Food\nStatus: Pending\nDescription: Cold soup",
        ));
        let app = init_app!(harness.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({"message": "anything new on the soup?", "userId": "u1"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["source"], "ai");
        assert_eq!(body["summaries"][0]["type"], "Food");
        assert_eq!(body["summaries"][0]["index"], 1);

        let prompts = harness.model.prompts();
        assert!(prompts[0].contains("No complaints found for this user."));
    }

    #[actix_web::test]
    async fn test_blank_message_is_400() {
        let harness = Harness::new(StubModel::failing());
        let app = init_app!(harness.state.clone());

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({"message": "   "}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
