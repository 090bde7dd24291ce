//! Email dispatch handler

use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use mailway_core::api::{self, ApiFailure, ApiFailureBody};
use tracing::error;

use super::types::{AppState, SendEmailBody, SendEmailResponseBody};
use crate::errors::EmailError;
use crate::validation;

/// Configure dispatch routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/send", post(send_email))
}

/// Map a service failure onto the response envelope.
pub(super) fn failure(message: &str, err: EmailError) -> ApiFailure {
    match err {
        EmailError::Validation(errors) => api::validation_failure(errors),
        EmailError::UnsupportedProvider(provider) => {
            api::bad_request(format!("Unsupported email provider: {}", provider))
        }
        other => api::internal_server_error(message, other.detail()),
    }
}

/// Send an email
#[utoipa::path(
    tag = "Mail",
    post,
    path = "/send",
    request_body = SendEmailBody,
    responses(
        (status = 200, description = "Email sent", body = SendEmailResponseBody),
        (status = 400, description = "Validation failed", body = ApiFailureBody),
        (status = 500, description = "Verification or dispatch failed", body = ApiFailureBody)
    )
)]
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendEmailBody>,
) -> Result<impl IntoResponse, ApiFailure> {
    let request =
        validation::validate_send_request(body).map_err(|e| failure("Failed to send email", e))?;

    let outcome = state.mailer.send(request).await.map_err(|e| {
        error!("Failed to send email: {}", e);
        failure("Failed to send email", e)
    })?;

    Ok((
        StatusCode::OK,
        Json(SendEmailResponseBody {
            success: true,
            message: "Email sent successfully".to_string(),
            message_id: outcome.message_id,
        }),
    ))
}
