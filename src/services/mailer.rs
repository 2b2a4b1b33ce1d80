//! Outbound email over SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async transport and sends a plain-text
//! body with an HTML alternative. When no relay is configured the service
//! runs with [`DisabledMailer`], which fails every send.

use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::error::{AppError, AppResult};

/// A rendered email
#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl MailMessage {
    /// Mail carrying the sign-up verification code
    pub fn verification_code(email: &str, code: &str) -> Self {
        Self {
            subject: "Cinetalk email verification".to_string(),
            text: format!(
                "Your Cinetalk verification code for {} is {}. It expires in 5 minutes.",
                email, code
            ),
            html: format!(
                "<html><body>\
                 <h2>Cinetalk email verification</h2>\
                 <p>Hello,</p>\
                 <p>{} was registered as a Cinetalk account ID.</p>\
                 <p>Enter the code below to finish signing up.</p>\
                 <h3><strong>{}</strong></h3>\
                 </body></html>",
                email, code
            ),
        }
    }

    /// Mail carrying a temporary password issued by the reset flow
    pub fn temporary_password(password: &str) -> Self {
        Self {
            subject: "Cinetalk temporary password".to_string(),
            text: format!(
                "Your temporary password is {}. Log in and change it right away.",
                password
            ),
            html: format!(
                "<html><body>\
                 <h2>Cinetalk temporary password</h2>\
                 <p>Here is the temporary password you requested.</p>\
                 <h3><strong>{}</strong></h3>\
                 <p>Be sure to change it after logging in.</p>\
                 </body></html>",
                password
            ),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, message: MailMessage) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// RFC 5322 "From" mailbox
    pub from_address: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

pub struct SmtpMailer {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> AppResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Mail(e.to_string()))?
            .port(config.port);

        if let (Some(user), Some(password)) = (&config.user, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, message: MailMessage) -> AppResult<()> {
        let from: Mailbox = self
            .config
            .from_address
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid sender address: {}", e)))?;
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| AppError::InvalidInput(format!("Invalid email address: {}", e)))?;

        let email = Message::builder()
            .from(from)
            .to(recipient)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text,
                message.html,
            ))
            .map_err(|e| AppError::Mail(e.to_string()))?;

        self.transport.send(email).await.map_err(|e| {
            tracing::error!(to = %to, error = %e, "Email delivery failed");
            AppError::Mail(e.to_string())
        })?;

        tracing::info!(to = %to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Stand-in used when SMTP is not configured
pub struct DisabledMailer;

#[async_trait::async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, to: &str, message: MailMessage) -> AppResult<()> {
        tracing::warn!(to = %to, subject = %message.subject, "Email delivery is not configured");
        Err(AppError::Mail("Email delivery is not configured".to_string()))
    }
}
