//! Request validation: raw wire bodies to normalized, fully-typed requests
//!
//! Every function returns either a normalized value or the full list of
//! field-level messages, never both. No transport is constructed and no
//! network I/O happens until validation has passed. Address syntax is
//! checked by parsing with `lettre::Address`, the same type the messages
//! are built from.

use lettre::Address;

use crate::errors::EmailError;
use crate::handlers::types::{SendEmailBody, SendTestBody};
use crate::message::{
    SendRequest, TestSendRequest, DEFAULT_TEST_SENDER_ADDRESS, DEFAULT_TEST_SENDER_NAME,
};
use crate::settings::{
    AccountSettingsBody, ProviderKind, ProviderSettings, ProviderSettingsBody,
};

fn require_text(field: &str, value: Option<String>, errors: &mut Vec<String>) -> Option<String> {
    match value {
        None => {
            errors.push(format!("{} is required", field));
            None
        }
        Some(value) if value.trim().is_empty() => {
            errors.push(format!("{} must be a non-empty string", field));
            None
        }
        Some(value) => Some(value),
    }
}

fn require_address(field: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<Address> {
    match value {
        None => {
            errors.push(format!("{} is required", field));
            None
        }
        Some(raw) => match raw.trim().parse::<Address>() {
            Ok(address) => Some(address),
            Err(_) => {
                errors.push(format!("{} must be a valid email address", field));
                None
            }
        },
    }
}

fn optional_address(field: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<Address> {
    match value {
        None => None,
        Some(raw) => match raw.trim().parse::<Address>() {
            Ok(address) => Some(address),
            Err(_) => {
                errors.push(format!("{} must be a valid email address", field));
                None
            }
        },
    }
}

fn account_settings(
    body: Option<&AccountSettingsBody>,
    tag: &str,
    build: impl FnOnce(String, String) -> ProviderSettings,
    errors: &mut Vec<String>,
) -> Option<ProviderSettings> {
    match body {
        None => {
            errors.push(format!("settings.{} is required when provider is {}", tag, tag));
            None
        }
        Some(account) => {
            let user = require_address(
                &format!("settings.{}.user", tag),
                account.user.as_deref(),
                errors,
            )
            .map(|address| address.to_string());
            let pass = require_text(&format!("settings.{}.pass", tag), account.pass.clone(), errors);
            match (user, pass) {
                (Some(user), Some(pass)) => Some(build(user, pass)),
                _ => None,
            }
        }
    }
}

/// Check the wire settings into the internal tagged union.
///
/// An unknown provider tag fails immediately; a known tag requires the
/// matching credential sub-object to be present and internally valid.
pub fn validate_settings(body: &ProviderSettingsBody) -> Result<ProviderSettings, Vec<String>> {
    let kind = match body.provider.as_deref() {
        None => return Err(vec!["settings.provider is required".to_string()]),
        Some(raw) => match ProviderKind::from_str(raw) {
            Ok(kind) => kind,
            Err(err) => return Err(vec![err.to_string()]),
        },
    };

    let mut errors = Vec::new();
    let settings = match kind {
        ProviderKind::Smtp => match body.smtp.as_ref() {
            None => {
                errors.push("settings.smtp is required when provider is smtp".to_string());
                None
            }
            Some(smtp) => {
                let host = require_text("settings.smtp.host", smtp.host.clone(), &mut errors);
                let port = match smtp.port {
                    None => {
                        errors.push("settings.smtp.port is required".to_string());
                        None
                    }
                    Some(port) if !(1..=65535).contains(&port) => {
                        errors.push(
                            "settings.smtp.port must be a valid TCP port (1-65535)".to_string(),
                        );
                        None
                    }
                    Some(port) => Some(port as u16),
                };
                let secure = match smtp.secure {
                    None => {
                        errors.push("settings.smtp.secure is required".to_string());
                        None
                    }
                    Some(secure) => Some(secure),
                };
                let (user, pass) = match smtp.auth.as_ref() {
                    None => {
                        errors.push("settings.smtp.auth is required".to_string());
                        (None, None)
                    }
                    Some(auth) => (
                        require_address("settings.smtp.auth.user", auth.user.as_deref(), &mut errors)
                            .map(|address| address.to_string()),
                        require_text("settings.smtp.auth.pass", auth.pass.clone(), &mut errors),
                    ),
                };
                match (host, port, secure, user, pass) {
                    (Some(host), Some(port), Some(secure), Some(user), Some(pass)) => {
                        Some(ProviderSettings::Smtp {
                            host,
                            port,
                            secure,
                            user,
                            pass,
                        })
                    }
                    _ => None,
                }
            }
        },
        ProviderKind::Gmail => account_settings(
            body.gmail.as_ref(),
            "gmail",
            |user, pass| ProviderSettings::Gmail { user, pass },
            &mut errors,
        ),
        ProviderKind::Outlook => account_settings(
            body.outlook.as_ref(),
            "outlook",
            |user, pass| ProviderSettings::Outlook { user, pass },
            &mut errors,
        ),
        ProviderKind::Sendgrid => match body.sendgrid.as_ref() {
            None => {
                errors.push("settings.sendgrid is required when provider is sendgrid".to_string());
                None
            }
            Some(sendgrid) => {
                require_text("settings.sendgrid.apiKey", sendgrid.api_key.clone(), &mut errors)
                    .map(|api_key| ProviderSettings::Sendgrid { api_key })
            }
        },
        ProviderKind::Mailgun => match body.mailgun.as_ref() {
            None => {
                errors.push("settings.mailgun is required when provider is mailgun".to_string());
                None
            }
            Some(mailgun) => {
                let api_key =
                    require_text("settings.mailgun.apiKey", mailgun.api_key.clone(), &mut errors);
                let domain =
                    require_text("settings.mailgun.domain", mailgun.domain.clone(), &mut errors);
                match (api_key, domain) {
                    (Some(api_key), Some(domain)) => {
                        Some(ProviderSettings::Mailgun { api_key, domain })
                    }
                    _ => None,
                }
            }
        },
    };

    match settings {
        Some(settings) => Ok(settings),
        None => Err(errors),
    }
}

/// Validate the full send request body into a normalized [`SendRequest`].
pub fn validate_send_request(body: SendEmailBody) -> Result<SendRequest, EmailError> {
    let mut errors = Vec::new();

    let to = require_address("to", body.to.as_deref(), &mut errors);
    let subject = require_text("subject", body.subject, &mut errors);
    let html = require_text("html", body.html, &mut errors);
    let text = require_text("text", body.text, &mut errors);

    let (from_name, from_address) = match body.from {
        None => {
            errors.push("from is required".to_string());
            (None, None)
        }
        Some(from) => (
            require_text("from.name", from.name, &mut errors),
            require_address("from.address", from.address.as_deref(), &mut errors),
        ),
    };

    let reply_to = optional_address("replyTo", body.reply_to.as_deref(), &mut errors);

    let settings = match body.settings {
        None => {
            errors.push("settings is required".to_string());
            None
        }
        Some(settings_body) => match validate_settings(&settings_body) {
            Ok(settings) => Some(settings),
            Err(mut settings_errors) => {
                errors.append(&mut settings_errors);
                None
            }
        },
    };

    match (to, subject, html, text, from_name, from_address, settings) {
        (
            Some(to),
            Some(subject),
            Some(html),
            Some(text),
            Some(from_name),
            Some(from_address),
            Some(settings),
        ) if errors.is_empty() => Ok(SendRequest {
            to,
            subject,
            html,
            text,
            from_name,
            from_address,
            reply_to,
            settings,
        }),
        _ => Err(EmailError::Validation(errors)),
    }
}

/// Validate the connection-test body: settings only, full depth.
pub fn validate_connection_request(
    settings: Option<ProviderSettingsBody>,
) -> Result<ProviderSettings, EmailError> {
    match settings {
        None => Err(EmailError::Validation(vec!["settings is required".to_string()])),
        Some(body) => validate_settings(&body).map_err(EmailError::Validation),
    }
}

/// Validate the test-email body into a normalized [`TestSendRequest`].
///
/// The sender identity defaults to `"Test" <test@example.com>` when the
/// `settings.from` override is absent.
pub fn validate_send_test(body: SendTestBody) -> Result<TestSendRequest, EmailError> {
    let mut errors = Vec::new();

    let to = require_address("testEmail", body.test_email.as_deref(), &mut errors);

    let (settings, from_name, from_address) = match body.settings {
        None => {
            errors.push("settings is required".to_string());
            (None, None, None)
        }
        Some(settings_body) => {
            let (from_name, from_address) = match settings_body.from.as_ref() {
                None => (
                    Some(DEFAULT_TEST_SENDER_NAME.to_string()),
                    DEFAULT_TEST_SENDER_ADDRESS.parse::<Address>().ok(),
                ),
                Some(from) => {
                    let name = from
                        .name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_TEST_SENDER_NAME.to_string());
                    let address = match from.email.as_deref() {
                        None => DEFAULT_TEST_SENDER_ADDRESS.parse::<Address>().ok(),
                        Some(raw) => {
                            optional_address("settings.from.email", Some(raw), &mut errors)
                        }
                    };
                    (Some(name), address)
                }
            };

            let settings = match validate_settings(&settings_body) {
                Ok(settings) => Some(settings),
                Err(mut settings_errors) => {
                    errors.append(&mut settings_errors);
                    None
                }
            };
            (settings, from_name, from_address)
        }
    };

    match (to, settings, from_name, from_address) {
        (Some(to), Some(settings), Some(from_name), Some(from_address)) if errors.is_empty() => {
            Ok(TestSendRequest {
                to,
                from_name,
                from_address,
                settings,
            })
        }
        _ => Err(EmailError::Validation(errors)),
    }
}
