//! Shared HTTP plumbing for Mailway
//!
//! Currently this is the failure envelope every handler speaks:
//! `{"success": false, "message": ...}` plus either field-level `errors`
//! or a single underlying `error` string.

pub mod api;

pub use api::{
    bad_request, internal_server_error, unauthorized, validation_failure, ApiFailure,
    ApiFailureBody,
};
