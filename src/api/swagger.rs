use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Complaint Portal API",
        version = "1.0.0",
        description = "Backend for the multi-sector complaint portal. \n\n**Features:**\n- Registration and login (bcrypt)\n- Complaint intake for Food, Hospital and Hotel sectors\n- Complaint tracking and statistics\n- OTP and contact emails (SMTP with console fallback)\n- Complaint assistant backed by Gemini with canned fallbacks\n\n**Authentication:** only the admin endpoints require a bearer key (`ADMIN_API_KEY`).",
        contact(
            name = "ComplaintPortal Support",
            email = "support@complaintportal.com"
        )
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Auth
        crate::api::auth::register,
        crate::api::auth::login,

        // Users
        crate::api::users::get_user,
        crate::api::users::update_user,

        // Complaints
        crate::api::complaints::submit_complaint,
        crate::api::complaints::list_complaints,
        crate::api::complaints::get_complaint,
        crate::api::complaints::complaint_stats,

        // Notifications
        crate::api::otp::send_otp,
        crate::api::contact::submit_contact,

        // Assistant
        crate::api::chat::chat,

        // Admin
        crate::api::admin::update_complaint_status,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginResponse,
            crate::services::auth_service::RegisterResponse,
            crate::models::UserInfo,
            crate::models::ProfileUpdate,
            crate::services::complaint_service::ComplaintStats,
            crate::services::complaint_service::SectorCounts,
            crate::api::otp::SendOtpRequest,
            crate::api::otp::SendOtpResponse,
            crate::services::email_service::DeliveryMethod,
            crate::api::contact::ContactRequest,
            crate::api::chat::ChatRequest,
            crate::services::assistant_service::AssistantReply,
            crate::services::assistant_service::ComplaintSummary,
            crate::services::assistant_service::ReplySource,
            crate::api::admin::StatusUpdateRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service and database liveness."),
        (name = "Auth", description = "Account registration and login."),
        (name = "Users", description = "Profile lookup and edits."),
        (name = "Complaints", description = "Complaint intake, listing and statistics."),
        (name = "Notifications", description = "OTP verification emails and the contact form."),
        (name = "Assistant", description = "Complaint assistant chat."),
        (name = "Admin", description = "Out-of-band complaint status changes."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Admin API key"))
                        .build()
                ),
            );
        }
    }
}
