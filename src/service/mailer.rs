use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::error::CelebrateError;

/// A contact-form submission, already validated.
#[derive(Debug, Clone)]
pub struct ContactMail {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactMail {
    pub fn subject(&self) -> String {
        format!("New Contact Form Submission from {}", self.name)
    }

    pub fn html_body(&self) -> String {
        let name = escape_html(&self.name);
        let email = escape_html(&self.email);
        let phone = escape_html(&self.phone);
        let message = escape_html(&self.message);
        format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>From:</strong> {name} ({email})</p>\n\
             <p><strong>Phone:</strong> {phone}</p>\n\
             <h3>Message:</h3>\n\
             <p>{message}</p>\n\
             <br/>\n\
             <p><small>Note: You can reply directly to this email to contact {name}</small></p>\n"
        )
    }
}

/// Outbound mail transport used by the contact form.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Check that the transport is reachable before attempting a send.
    async fn verify(&self) -> Result<(), CelebrateError>;

    /// Deliver to the admin inbox with reply-to set to the submitter.
    async fn send_contact(&self, mail: &ContactMail) -> Result<(), CelebrateError>;
}

/// SMTP transport (implicit TLS relay) authenticated as the shop's mail account.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// `None` when credentials or the admin address are not configured.
    pub fn from_config(cfg: &MailConfig) -> Result<Option<Self>, CelebrateError> {
        let (Some(username), Some(password), Some(admin_email)) = (
            cfg.username.as_ref(),
            cfg.password.as_ref(),
            cfg.admin_email.as_ref(),
        ) else {
            return Ok(None);
        };

        let from = parse_mailbox(username)?;
        let to = parse_mailbox(admin_email)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build();

        Ok(Some(Self {
            transport,
            from,
            to,
        }))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn verify(&self) -> Result<(), CelebrateError> {
        if self.transport.test_connection().await? {
            info!("SMTP connection verified");
            Ok(())
        } else {
            Err(CelebrateError::MailError(
                "SMTP server did not accept the connection".to_string(),
            ))
        }
    }

    async fn send_contact(&self, mail: &ContactMail) -> Result<(), CelebrateError> {
        let reply_to = parse_mailbox(&mail.email)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(mail.subject())
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body())?;

        let response = self.transport.send(message).await?;
        info!(code = %response.code(), "contact mail sent");
        Ok(())
    }
}

/// Stand-in used when no SMTP account is configured; every attempt fails.
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn verify(&self) -> Result<(), CelebrateError> {
        warn!("contact mail requested but no SMTP account is configured");
        Err(CelebrateError::MailError(
            "mail transport not configured".to_string(),
        ))
    }

    async fn send_contact(&self, _mail: &ContactMail) -> Result<(), CelebrateError> {
        Err(CelebrateError::MailError(
            "mail transport not configured".to_string(),
        ))
    }
}

pub fn parse_mailbox(raw: &str) -> Result<Mailbox, CelebrateError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|_| CelebrateError::InvalidRequest(format!("Invalid email address: {raw}")))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
