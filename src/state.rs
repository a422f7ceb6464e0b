use std::sync::Arc;

use crate::database::Store;
use crate::services::email_service::EmailService;
use crate::services::gemini_service::LanguageModel;

/// Shared handles injected into every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub email: EmailService,
    pub model: Arc<dyn LanguageModel>,
    /// Inbox that receives contact-form messages
    pub support_email: String,
}
