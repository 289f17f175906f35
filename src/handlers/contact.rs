use axum::{Json, extract::State};
use tracing::info;

use crate::error::CelebrateError;
use crate::middleware::json::ValidJson;
use crate::router::MarketState;
use crate::service::mailer::{ContactMail, parse_mailbox};
use crate::types::contact::{ContactRequest, ContactSent};

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<MarketState>,
    ValidJson(req): ValidJson<ContactRequest>,
) -> Result<Json<ContactSent>, CelebrateError> {
    let field = |value: Option<String>| value.unwrap_or_default().trim().to_string();
    let mail = ContactMail {
        name: field(req.name),
        email: field(req.email),
        phone: field(req.phone),
        message: field(req.message),
    };
    // Bad reply-to addresses are the caller's fault, not a transport failure.
    parse_mailbox(&mail.email)?;

    state.mailer.verify().await?;
    state.mailer.send_contact(&mail).await?;
    info!(from = %mail.email, "contact form delivered");

    Ok(Json(ContactSent {
        message: "Message sent successfully",
    }))
}
