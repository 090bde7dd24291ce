//! The API failure envelope
//!
//! Every failed request carries `success: false`, a human-readable
//! `message`, and either `errors` (field-level validation messages on 400)
//! or `error` (the underlying transport failure text on 500).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// JSON body of a failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiFailureBody {
    /// Always false for failures
    pub success: bool,
    /// Human-readable summary of what went wrong
    #[schema(example = "Validation failed")]
    pub message: String,
    /// Field-level validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = json!(["to must be a valid email address"]))]
    pub errors: Option<Vec<String>>,
    /// Failure text from the underlying transport layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A failed request: status code plus the response body
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: ApiFailureBody,
}

impl ApiFailure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiFailureBody {
                success: false,
                message: message.into(),
                errors: None,
                error: None,
            },
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.body.errors = Some(errors);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.body.error = Some(error.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// 400 carrying the full list of validation messages
pub fn validation_failure(errors: Vec<String>) -> ApiFailure {
    ApiFailure::new(StatusCode::BAD_REQUEST, "Validation failed").with_errors(errors)
}

/// 400 with a flat message
pub fn bad_request(message: impl Into<String>) -> ApiFailure {
    ApiFailure::new(StatusCode::BAD_REQUEST, message)
}

/// 500 carrying the underlying failure text
pub fn internal_server_error(message: impl Into<String>, error: impl Into<String>) -> ApiFailure {
    ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_error(error)
}

/// 401 for requests missing the configured API key
pub fn unauthorized() -> ApiFailure {
    ApiFailure::new(StatusCode::UNAUTHORIZED, "Missing or invalid API key")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(failure: ApiFailure) -> serde_json::Value {
        serde_json::to_value(&failure.body).unwrap()
    }

    #[test]
    fn test_validation_failure_shape() {
        let failure = validation_failure(vec!["to is required".to_string()]);
        assert_eq!(failure.status(), StatusCode::BAD_REQUEST);

        let json = body_json(failure);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0], "to is required");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_internal_server_error_shape() {
        let failure = internal_server_error("Failed to send email", "connection refused");
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(failure);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to send email");
        assert_eq!(json["error"], "connection refused");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_bad_request_omits_detail_fields() {
        let json = body_json(bad_request("Unsupported email provider: ses"));
        assert_eq!(json["message"], "Unsupported email provider: ses");
        assert!(json.get("errors").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_unauthorized() {
        let failure = unauthorized();
        assert_eq!(failure.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(failure.message(), "Missing or invalid API key");
    }
}
