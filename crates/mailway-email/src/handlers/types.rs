//! Handler types for the mail dispatch endpoints
//!
//! Request fields are optional at the wire level so the validator can
//! report every missing field by name instead of failing on the first
//! deserialization error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::mailer::MailerService;
use crate::settings::ProviderSettingsBody;

/// Application state for mail handlers
pub struct AppState {
    pub mailer: Arc<MailerService>,
}

/// Sender identity for an outbound message
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SenderIdentityBody {
    /// Display name rendered in the From header
    #[schema(example = "Course Updates")]
    pub name: Option<String>,
    /// Sender email address
    #[schema(example = "no-reply@example.com")]
    pub address: Option<String>,
}

/// Request body for POST /send
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailBody {
    /// Recipient email address
    #[schema(example = "learner@example.com")]
    pub to: Option<String>,
    /// Subject line
    #[schema(example = "Welcome to the course")]
    pub subject: Option<String>,
    /// HTML body
    pub html: Option<String>,
    /// Plain-text body
    pub text: Option<String>,
    /// Sender identity
    pub from: Option<SenderIdentityBody>,
    /// Reply-To address; the sender address is used when omitted
    pub reply_to: Option<String>,
    /// Provider selection and credentials
    pub settings: Option<ProviderSettingsBody>,
}

/// Success body for POST /send and POST /send-test
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponseBody {
    pub success: bool,
    #[schema(example = "Email sent successfully")]
    pub message: String,
    /// Message-ID of the dispatched email
    pub message_id: String,
}

/// Request body for POST /test-connection
#[derive(Debug, Deserialize, ToSchema)]
pub struct TestConnectionBody {
    pub settings: Option<ProviderSettingsBody>,
}

/// Success body for POST /test-connection
#[derive(Debug, Serialize, ToSchema)]
pub struct TestConnectionResponseBody {
    pub success: bool,
    #[schema(example = "Connection verified successfully")]
    pub message: String,
}

/// Request body for POST /send-test
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendTestBody {
    pub settings: Option<ProviderSettingsBody>,
    /// Recipient of the test message
    #[schema(example = "admin@example.com")]
    pub test_email: Option<String>,
}
