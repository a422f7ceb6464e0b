pub mod auth;
pub mod security_headers;

pub use auth::AdminAuth;
pub use security_headers::SecurityHeaders;
