//! Outbound message construction

use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message};
use uuid::Uuid;

use crate::errors::EmailError;
use crate::settings::ProviderSettings;

/// Subject line of the fixed-template test message
pub const TEST_SUBJECT: &str = "Test Email from Rihab Technologies";

/// Default sender identity for test messages when none is configured
pub const DEFAULT_TEST_SENDER_NAME: &str = "Test";
pub const DEFAULT_TEST_SENDER_ADDRESS: &str = "test@example.com";

/// A validated, normalized send request
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub to: Address,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub from_name: String,
    pub from_address: Address,
    pub reply_to: Option<Address>,
    pub settings: ProviderSettings,
}

/// A validated request for the fixed-template test message
#[derive(Debug, Clone)]
pub struct TestSendRequest {
    pub to: Address,
    pub from_name: String,
    pub from_address: Address,
    pub settings: ProviderSettings,
}

/// A message ready for dispatch, plus the Message-ID it carries
pub struct OutboundMessage {
    pub message: Message,
    pub message_id: String,
}

// Generated up front so the id returned to the caller is the Message-ID
// actually on the wire.
fn generate_message_id(from: &Address) -> String {
    format!("<{}@{}>", Uuid::new_v4(), from.domain())
}

fn assemble(
    from_name: &str,
    from_address: &Address,
    to: &Address,
    reply_to: &Address,
    subject: &str,
    text: String,
    html: String,
) -> Result<OutboundMessage, EmailError> {
    let message_id = generate_message_id(from_address);

    let message = Message::builder()
        .from(Mailbox::new(
            Some(from_name.to_string()),
            from_address.clone(),
        ))
        .to(Mailbox::new(None, to.clone()))
        .reply_to(Mailbox::new(None, reply_to.clone()))
        .subject(subject)
        .message_id(Some(message_id.clone()))
        .multipart(MultiPart::alternative_plain_html(text, html))
        .map_err(|e| EmailError::Transport(e.to_string()))?;

    Ok(OutboundMessage {
        message,
        message_id,
    })
}

/// Build the outbound message for a send request.
///
/// Reply-To falls back to the sender's own address when not provided.
pub fn build_message(request: &SendRequest) -> Result<OutboundMessage, EmailError> {
    let reply_to = request
        .reply_to
        .as_ref()
        .unwrap_or(&request.from_address);

    assemble(
        &request.from_name,
        &request.from_address,
        &request.to,
        reply_to,
        &request.subject,
        request.text.clone(),
        request.html.clone(),
    )
}

/// Build the fixed-template test message, embedding the provider tag and
/// the current UTC timestamp.
pub fn build_test_message(request: &TestSendRequest) -> Result<OutboundMessage, EmailError> {
    let provider = request.settings.kind();
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let html = format!(
        "<h2>SMTP configuration works</h2>\
         <p>This test email was sent through the <strong>{}</strong> provider.</p>\
         <p>Sent at: {}</p>",
        provider, timestamp
    );
    let text = format!(
        "SMTP configuration works.\n\
         This test email was sent through the {} provider.\n\
         Sent at: {}",
        provider, timestamp
    );

    assemble(
        &request.from_name,
        &request.from_address,
        &request.to,
        &request.from_address,
        TEST_SUBJECT,
        text,
        html,
    )
}
