pub mod assistant_service;
pub mod auth_service;
pub mod complaint_service;
pub mod email_service;
pub mod fallback_responses;
pub mod gemini_service;
