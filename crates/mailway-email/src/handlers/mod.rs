//! HTTP handlers for the mail dispatch service

mod connection;
mod send;
pub mod types;

pub use types::AppState;

use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;

/// Configure mail routes
pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(send::routes())
        .merge(connection::routes())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        send::send_email,
        connection::test_connection,
        connection::send_test_email,
    ),
    components(
        schemas(
            // Request types
            types::SendEmailBody,
            types::SenderIdentityBody,
            types::TestConnectionBody,
            types::SendTestBody,
            crate::settings::ProviderSettingsBody,
            crate::settings::SmtpSettingsBody,
            crate::settings::SmtpAuthBody,
            crate::settings::AccountSettingsBody,
            crate::settings::SendgridSettingsBody,
            crate::settings::MailgunSettingsBody,
            crate::settings::TestSenderBody,
            // Response types
            types::SendEmailResponseBody,
            types::TestConnectionResponseBody,
            mailway_core::api::ApiFailureBody,
        )
    ),
    tags(
        (name = "Mail", description = "Transactional email dispatch endpoints")
    )
)]
pub struct MailApiDoc;
