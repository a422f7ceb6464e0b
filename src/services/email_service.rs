use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SmtpConfig;
use crate::models::{Complaint, ContactMessage};
use crate::utils::text::{escape_html, truncate_chars};
use crate::utils::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Plain-text gist of the message, shown by the console mailer.
    pub summary: String,
}

/// A way of getting an email out of the process.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError>;
}

/// SMTP delivery (STARTTLS relay with username/password).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| AppError::EmailError(format!("Invalid sender address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::EmailError(format!("Invalid SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(10)))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::EmailError(format!("Invalid recipient '{}': {}", email.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| AppError::EmailError(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::EmailError(format!("SMTP delivery failed: {}", e)))?;

        Ok(())
    }
}

/// Development stand-in: writes the email to the log instead of sending it.
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        for line in console_lines(email) {
            log::info!("{}", line);
        }
        Ok(())
    }
}

fn console_lines(email: &OutgoingEmail) -> Vec<String> {
    vec![
        "=== MOCK EMAIL SERVICE ===".to_string(),
        format!("To: {}", email.to),
        format!("Subject: {}", email.subject),
        email.summary.clone(),
        format!("HTML Content: {}", truncate_chars(&email.html, 200)),
        "=== END MOCK EMAIL ===".to_string(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Mock,
}

/// Primary mailer with a single fallback hop.
#[derive(Clone)]
pub struct EmailService {
    primary: Option<Arc<dyn Mailer>>,
    fallback: Arc<dyn Mailer>,
}

impl EmailService {
    pub fn new(primary: Option<Arc<dyn Mailer>>, fallback: Arc<dyn Mailer>) -> Self {
        Self { primary, fallback }
    }

    /// SMTP when configured and valid, console mailer otherwise (and as fallback).
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Self {
        let primary: Option<Arc<dyn Mailer>> = match smtp {
            Some(config) => match SmtpMailer::new(config) {
                Ok(mailer) => {
                    log::info!("📧 SMTP mailer ready ({}:{})", config.host, config.port);
                    Some(Arc::new(mailer))
                }
                Err(e) => {
                    log::warn!("⚠️  SMTP disabled: {}", e);
                    None
                }
            },
            None => {
                log::info!("📧 No SMTP credentials, emails go to the console mailer");
                None
            }
        };

        Self::new(primary, Arc::new(ConsoleMailer))
    }

    pub async fn deliver(&self, email: OutgoingEmail) -> Result<DeliveryMethod, AppError> {
        if let Some(primary) = &self.primary {
            match primary.send(&email).await {
                Ok(()) => {
                    log::info!("✅ Email sent to {}: {}", email.to, email.subject);
                    return Ok(DeliveryMethod::Email);
                }
                Err(e) => {
                    log::warn!("⚠️  Email service failed, using mock service: {}", e);
                }
            }
        }

        self.fallback.send(&email).await.map_err(|e| {
            log::error!("❌ Mock email service also failed: {}", e);
            e
        })?;

        Ok(DeliveryMethod::Mock)
    }

    pub async fn send_otp(&self, to: &str, otp: &str) -> Result<DeliveryMethod, AppError> {
        self.deliver(otp_email(to, otp)).await
    }

    pub async fn send_complaint_confirmation(
        &self,
        to: &str,
        complaint: &Complaint,
    ) -> Result<DeliveryMethod, AppError> {
        self.deliver(complaint_confirmation_email(to, complaint)).await
    }

    pub async fn send_status_update(
        &self,
        to: &str,
        complaint: &Complaint,
    ) -> Result<DeliveryMethod, AppError> {
        self.deliver(status_update_email(to, complaint)).await
    }

    pub async fn send_contact_message(
        &self,
        support_inbox: &str,
        message: &ContactMessage,
    ) -> Result<DeliveryMethod, AppError> {
        self.deliver(contact_email(support_inbox, message)).await
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f8fafc;">
  <div style="background: #667eea; padding: 30px; border-radius: 10px; text-align: center;">
    <h1 style="color: white; margin: 0; font-size: 28px;">{}</h1>
  </div>
  <div style="background: white; padding: 30px; border-radius: 10px; margin-top: 20px;">
{}
  </div>
</div>"#,
        escape_html(title),
        body
    )
}

pub fn otp_email(to: &str, otp: &str) -> OutgoingEmail {
    let body = format!(
        r#"    <h2 style="color: #333;">Your OTP Code</h2>
    <p>Thank you for registering with ComplaintPortal. Please use the following OTP to verify your email address:</p>
    <p style="font-size: 32px; font-weight: bold; color: #667eea; letter-spacing: 4px; text-align: center;">{}</p>
    <p style="font-size: 14px;">This OTP will expire in 10 minutes. If you didn't request this, please ignore this email.</p>"#,
        escape_html(otp)
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: "Verify Your Email - ComplaintPortal".to_string(),
        html: layout("Verify Your Email", &body),
        summary: format!("OTP: {}", otp),
    }
}

pub fn complaint_confirmation_email(to: &str, complaint: &Complaint) -> OutgoingEmail {
    let body = format!(
        r#"    <h2 style="color: #333;">Thank you for your complaint</h2>
    <p>Your complaint has been successfully submitted and is being reviewed by our team.</p>
    <p><strong>Reference:</strong> {}</p>
    <p><strong>Type:</strong> {}</p>
    <p><strong>Status:</strong> {}</p>
    <p><strong>Submitted:</strong> {}</p>
    <p style="font-size: 14px;">You will receive updates on your complaint status via email. You can also track your complaint in your dashboard.</p>"#,
        escape_html(&complaint.id),
        complaint.sector,
        escape_html(complaint.status().as_str()),
        escape_html(&complaint.submitted_at())
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: "Complaint Confirmation - ComplaintPortal".to_string(),
        html: layout("Complaint Received", &body),
        summary: format!(
            "Complaint {} ({}) received with status {}",
            complaint.id,
            complaint.sector,
            complaint.status()
        ),
    }
}

pub fn status_update_email(to: &str, complaint: &Complaint) -> OutgoingEmail {
    let body = format!(
        r#"    <h2 style="color: #333;">Your complaint status has changed</h2>
    <p><strong>Reference:</strong> {}</p>
    <p><strong>Type:</strong> {}</p>
    <p><strong>New status:</strong> {}</p>"#,
        escape_html(&complaint.id),
        complaint.sector,
        escape_html(complaint.status().as_str())
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Complaint {} - ComplaintPortal", complaint.status()),
        html: layout("Complaint Update", &body),
        summary: format!("Complaint {} is now {}", complaint.id, complaint.status()),
    }
}

pub fn contact_email(support_inbox: &str, message: &ContactMessage) -> OutgoingEmail {
    let body = format!(
        r#"    <h2 style="color: #333;">Contact Details</h2>
    <p><strong>Name:</strong> {}</p>
    <p><strong>Email:</strong> {}</p>
    <p><strong>Subject:</strong> {}</p>
    <h3 style="color: #333;">Message:</h3>
    <p style="line-height: 1.6;">{}</p>"#,
        escape_html(&message.name),
        escape_html(&message.email),
        escape_html(&message.subject),
        escape_html(&message.message)
    );

    OutgoingEmail {
        to: support_inbox.to_string(),
        subject: format!("Contact Form: {}", message.subject),
        html: layout("New Contact Message", &body),
        summary: format!("From {} <{}>: {}", message.name, message.email, message.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingMailer;

    #[test]
    fn test_console_output_shows_otp() {
        let email = otp_email("ana@example.com", "482913");
        assert!(!truncate_chars(&email.html, 200).contains("482913"));

        let lines = console_lines(&email);
        assert!(lines.iter().any(|line| line == "OTP: 482913"));
        assert!(lines.iter().any(|line| line == "To: ana@example.com"));
    }

    #[tokio::test]
    async fn test_primary_success_reports_email() {
        let primary = Arc::new(RecordingMailer::new());
        let fallback = Arc::new(RecordingMailer::new());
        let service = EmailService::new(Some(primary.clone()), fallback.clone());

        let method = service.send_otp("ana@example.com", "123456").await.unwrap();

        assert_eq!(method, DeliveryMethod::Email);
        assert_eq!(primary.sent().len(), 1);
        assert!(fallback.sent().is_empty());
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_mock() {
        let primary = Arc::new(RecordingMailer::failing());
        let fallback = Arc::new(RecordingMailer::new());
        let service = EmailService::new(Some(primary), fallback.clone());

        let method = service.send_otp("ana@example.com", "123456").await.unwrap();

        assert_eq!(method, DeliveryMethod::Mock);
        let sent = fallback.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("123456"));
    }

    #[tokio::test]
    async fn test_both_failing_is_an_error() {
        let service = EmailService::new(
            Some(Arc::new(RecordingMailer::failing())),
            Arc::new(RecordingMailer::failing()),
        );
        assert!(service.send_otp("ana@example.com", "123456").await.is_err());
    }

    #[tokio::test]
    async fn test_without_primary_goes_straight_to_mock() {
        let fallback = Arc::new(RecordingMailer::new());
        let service = EmailService::new(None, fallback.clone());

        let method = service.send_otp("ana@example.com", "4321").await.unwrap();
        assert_eq!(method, DeliveryMethod::Mock);
        assert_eq!(fallback.sent().len(), 1);
    }

    #[test]
    fn test_contact_email_escapes_user_input() {
        let message = ContactMessage {
            id: "m1".to_string(),
            name: "<script>".to_string(),
            email: "eve@example.com".to_string(),
            subject: "Hi".to_string(),
            message: "a & b".to_string(),
            created_at: "now".to_string(),
        };
        let email = contact_email("support@example.com", &message);
        assert_eq!(email.to, "support@example.com");
        assert_eq!(email.subject, "Contact Form: Hi");
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("a &amp; b"));
    }

    #[test]
    fn test_smtp_mailer_rejects_bad_sender() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "user".to_string(),
            password: "pass".to_string(),
            from: "not an address".to_string(),
        };
        assert!(SmtpMailer::new(&config).is_err());
    }
}
