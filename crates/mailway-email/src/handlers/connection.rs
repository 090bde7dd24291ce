//! Connection-test and test-email handlers

use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use mailway_core::api::{ApiFailure, ApiFailureBody};
use tracing::error;

use super::send::failure;
use super::types::{
    AppState, SendEmailResponseBody, SendTestBody, TestConnectionBody, TestConnectionResponseBody,
};
use crate::validation;

/// Configure connection-test routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/test-connection", post(test_connection))
        .route("/send-test", post(send_test_email))
}

/// Verify provider connectivity without sending a message
#[utoipa::path(
    tag = "Mail",
    post,
    path = "/test-connection",
    request_body = TestConnectionBody,
    responses(
        (status = 200, description = "Connection verified", body = TestConnectionResponseBody),
        (status = 400, description = "Validation failed", body = ApiFailureBody),
        (status = 500, description = "Verification failed", body = ApiFailureBody)
    )
)]
pub async fn test_connection(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TestConnectionBody>,
) -> Result<impl IntoResponse, ApiFailure> {
    let settings = validation::validate_connection_request(body.settings)
        .map_err(|e| failure("Connection test failed", e))?;

    state.mailer.test_connection(&settings).await.map_err(|e| {
        error!("Connection test failed: {}", e);
        failure("Connection test failed", e)
    })?;

    Ok((
        StatusCode::OK,
        Json(TestConnectionResponseBody {
            success: true,
            message: "Connection verified successfully".to_string(),
        }),
    ))
}

/// Send a fixed-template test email
#[utoipa::path(
    tag = "Mail",
    post,
    path = "/send-test",
    request_body = SendTestBody,
    responses(
        (status = 200, description = "Test email sent", body = SendEmailResponseBody),
        (status = 400, description = "Validation failed", body = ApiFailureBody),
        (status = 500, description = "Verification or dispatch failed", body = ApiFailureBody)
    )
)]
pub async fn send_test_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendTestBody>,
) -> Result<impl IntoResponse, ApiFailure> {
    let request = validation::validate_send_test(body)
        .map_err(|e| failure("Failed to send test email", e))?;

    let outcome = state.mailer.send_test(request).await.map_err(|e| {
        error!("Failed to send test email: {}", e);
        failure("Failed to send test email", e)
    })?;

    Ok((
        StatusCode::OK,
        Json(SendEmailResponseBody {
            success: true,
            message: "Test email sent successfully".to_string(),
            message_id: outcome.message_id,
        }),
    ))
}
