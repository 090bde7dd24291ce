//! Transactional email dispatch for Mailway
//!
//! This crate maps a declarative provider selection (smtp, gmail, outlook,
//! sendgrid, mailgun) onto a concrete SMTP transport, verifies connectivity
//! and dispatches messages. It exposes three HTTP endpoints:
//! - `POST /send` — validate, verify and dispatch one message
//! - `POST /test-connection` — verify provider connectivity only
//! - `POST /send-test` — dispatch a fixed-template test message
//!
//! There is no persistence and no retry: every request resolves a fresh
//! transport, and every network round-trip runs under a deadline.

pub mod errors;
pub mod handlers;
pub mod mailer;
pub mod message;
pub mod settings;
pub mod transport;
pub mod validation;

// Re-export main types
pub use errors::EmailError;
pub use mailer::{
    MailTransport, MailerService, MockMailTransport, SendOutcome, SmtpMailTransport,
};
pub use message::{SendRequest, TestSendRequest};
pub use settings::{ProviderKind, ProviderSettings};
pub use transport::TransportConfig;
