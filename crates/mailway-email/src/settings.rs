//! Provider settings: the wire shape and the resolved tagged union
//!
//! On the wire, `settings` is a provider tag plus one credential sub-object
//! per provider, with exactly the sub-object matching the tag required.
//! `validation::validate_settings` checks that shape into the internal
//! [`ProviderSettings`] union so downstream code can match exhaustively.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::EmailError;

/// Supported mail provider tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Arbitrary SMTP server with explicit host/port
    Smtp,
    /// Gmail account (well-known host)
    Gmail,
    /// Outlook / Hotmail account (well-known host)
    Outlook,
    /// SendGrid SMTP relay, API key auth
    Sendgrid,
    /// Mailgun SMTP relay, API key auth
    Mailgun,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Smtp => write!(f, "smtp"),
            ProviderKind::Gmail => write!(f, "gmail"),
            ProviderKind::Outlook => write!(f, "outlook"),
            ProviderKind::Sendgrid => write!(f, "sendgrid"),
            ProviderKind::Mailgun => write!(f, "mailgun"),
        }
    }
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Result<Self, EmailError> {
        match s.to_lowercase().as_str() {
            "smtp" => Ok(ProviderKind::Smtp),
            "gmail" => Ok(ProviderKind::Gmail),
            "outlook" => Ok(ProviderKind::Outlook),
            "sendgrid" => Ok(ProviderKind::Sendgrid),
            "mailgun" => Ok(ProviderKind::Mailgun),
            _ => Err(EmailError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Credentials for the AUTH handshake against a raw SMTP server
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SmtpAuthBody {
    /// Account the server authenticates, e.g. a mailbox address
    #[schema(example = "mailer@example.com")]
    pub user: Option<String>,
    /// Password or app-specific secret
    pub pass: Option<String>,
}

/// Connection settings for an arbitrary SMTP server
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SmtpSettingsBody {
    /// Server hostname
    #[schema(example = "smtp.example.com")]
    pub host: Option<String>,
    /// TCP port; range-checked during validation so out-of-range values
    /// produce a field-level message instead of a deserialization error
    #[schema(example = 587)]
    pub port: Option<i64>,
    /// true for wrapper TLS (SMTPS), false for STARTTLS
    pub secure: Option<bool>,
    pub auth: Option<SmtpAuthBody>,
}

/// Account credentials for the well-known-host providers (gmail, outlook)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AccountSettingsBody {
    /// Mailbox the provider authenticates as
    #[schema(example = "someone@gmail.com")]
    pub user: Option<String>,
    /// Password or app password
    pub pass: Option<String>,
}

/// SendGrid credentials
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendgridSettingsBody {
    /// API key, used as the SMTP password with the literal user "apikey"
    pub api_key: Option<String>,
}

/// Mailgun credentials
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MailgunSettingsBody {
    /// SMTP API key
    pub api_key: Option<String>,
    /// Sending domain registered with Mailgun
    #[schema(example = "mg.example.com")]
    pub domain: Option<String>,
}

/// Sender identity override, read by the test-email endpoint only
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TestSenderBody {
    #[schema(example = "Test")]
    pub name: Option<String>,
    #[schema(example = "test@example.com")]
    pub email: Option<String>,
}

/// Wire shape of `settings`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProviderSettingsBody {
    /// One of smtp, gmail, outlook, sendgrid, mailgun
    #[schema(example = "smtp")]
    pub provider: Option<String>,
    pub smtp: Option<SmtpSettingsBody>,
    pub gmail: Option<AccountSettingsBody>,
    pub outlook: Option<AccountSettingsBody>,
    pub sendgrid: Option<SendgridSettingsBody>,
    pub mailgun: Option<MailgunSettingsBody>,
    /// Sender identity override, used by the test-email endpoint only
    pub from: Option<TestSenderBody>,
}

/// Resolved provider settings: exactly one variant per provider tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSettings {
    Smtp {
        host: String,
        port: u16,
        secure: bool,
        user: String,
        pass: String,
    },
    Gmail {
        user: String,
        pass: String,
    },
    Outlook {
        user: String,
        pass: String,
    },
    Sendgrid {
        api_key: String,
    },
    Mailgun {
        api_key: String,
        domain: String,
    },
}

impl ProviderSettings {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderSettings::Smtp { .. } => ProviderKind::Smtp,
            ProviderSettings::Gmail { .. } => ProviderKind::Gmail,
            ProviderSettings::Outlook { .. } => ProviderKind::Outlook,
            ProviderSettings::Sendgrid { .. } => ProviderKind::Sendgrid,
            ProviderSettings::Mailgun { .. } => ProviderKind::Mailgun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!(ProviderKind::from_str("smtp").unwrap(), ProviderKind::Smtp);
        assert_eq!(ProviderKind::from_str("GMAIL").unwrap(), ProviderKind::Gmail);
        assert_eq!(
            ProviderKind::from_str("outlook").unwrap(),
            ProviderKind::Outlook
        );
        assert_eq!(
            ProviderKind::from_str("sendgrid").unwrap(),
            ProviderKind::Sendgrid
        );
        assert_eq!(
            ProviderKind::from_str("mailgun").unwrap(),
            ProviderKind::Mailgun
        );
        assert!(ProviderKind::from_str("ses").is_err());
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Smtp.to_string(), "smtp");
        assert_eq!(ProviderKind::Gmail.to_string(), "gmail");
        assert_eq!(ProviderKind::Outlook.to_string(), "outlook");
        assert_eq!(ProviderKind::Sendgrid.to_string(), "sendgrid");
        assert_eq!(ProviderKind::Mailgun.to_string(), "mailgun");
    }

    #[test]
    fn test_deserialize_smtp_settings() {
        let body: ProviderSettingsBody = serde_json::from_str(
            r#"{
                "provider": "smtp",
                "smtp": {
                    "host": "smtp.example.com",
                    "port": 587,
                    "secure": false,
                    "auth": {"user": "mailer@example.com", "pass": "secret"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(body.provider.as_deref(), Some("smtp"));
        let smtp = body.smtp.unwrap();
        assert_eq!(smtp.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(smtp.port, Some(587));
        assert_eq!(smtp.secure, Some(false));
        assert_eq!(smtp.auth.unwrap().user.as_deref(), Some("mailer@example.com"));
    }

    #[test]
    fn test_deserialize_mailgun_settings_camel_case() {
        let body: ProviderSettingsBody = serde_json::from_str(
            r#"{
                "provider": "mailgun",
                "mailgun": {"apiKey": "key-123", "domain": "mg.example.com"}
            }"#,
        )
        .unwrap();

        let mailgun = body.mailgun.unwrap();
        assert_eq!(mailgun.api_key.as_deref(), Some("key-123"));
        assert_eq!(mailgun.domain.as_deref(), Some("mg.example.com"));
    }

    #[test]
    fn test_deserialize_test_sender_override() {
        let body: ProviderSettingsBody = serde_json::from_str(
            r#"{
                "provider": "sendgrid",
                "sendgrid": {"apiKey": "SG.abc"},
                "from": {"name": "Support", "email": "support@example.com"}
            }"#,
        )
        .unwrap();

        let from = body.from.unwrap();
        assert_eq!(from.name.as_deref(), Some("Support"));
        assert_eq!(from.email.as_deref(), Some("support@example.com"));
    }

    #[test]
    fn test_settings_kind() {
        let settings = ProviderSettings::Mailgun {
            api_key: "x".into(),
            domain: "example.com".into(),
        };
        assert_eq!(settings.kind(), ProviderKind::Mailgun);
    }
}
