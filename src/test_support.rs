// Test doubles and app wiring shared by the handler and service tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::database::MemoryStore;
use crate::services::email_service::{EmailService, Mailer, OutgoingEmail};
use crate::services::gemini_service::LanguageModel;
use crate::state::AppState;
use crate::utils::AppError;

pub const ADMIN_KEY: &str = "test-admin-key";

pub struct RecordingMailer {
    fail: bool,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self { fail: false, sent: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { fail: true, sent: Mutex::new(Vec::new()) }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::EmailError("smtp unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Canned model: replies with `reply` or fails, and remembers every prompt.
pub struct StubModel {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Self {
        Self { reply: Some(text.to_string()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { reply: None, prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| AppError::AiError("provider unavailable".to_string()))
    }
}

/// Handles kept by a test so it can inspect side effects after requests.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub primary_mail: Arc<RecordingMailer>,
    pub fallback_mail: Arc<RecordingMailer>,
    pub model: Arc<StubModel>,
    pub state: AppState,
}

impl Harness {
    pub fn new(model: StubModel) -> Self {
        Self::with_mailers(model, RecordingMailer::new(), RecordingMailer::new())
    }

    pub fn with_mailers(model: StubModel, primary: RecordingMailer, fallback: RecordingMailer) -> Self {
        let store = Arc::new(MemoryStore::new());
        let primary_mail = Arc::new(primary);
        let fallback_mail = Arc::new(fallback);
        let model = Arc::new(model);

        let state = AppState {
            store: store.clone(),
            email: EmailService::new(Some(primary_mail.clone()), fallback_mail.clone()),
            model: model.clone(),
            support_email: "support@example.com".to_string(),
        };

        Self { store, primary_mail, fallback_mail, model, state }
    }
}

/// Builds the full route table around a `Harness` state.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::middleware::SecurityHeaders)
                .app_data(actix_web::web::Data::new($state))
                .configure(|cfg| {
                    $crate::api::configure(cfg, Some($crate::test_support::ADMIN_KEY.to_string()))
                }),
        )
        .await
    };
}

pub(crate) use init_app;
