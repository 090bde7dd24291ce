//! Transport resolution: provider settings to a concrete SMTP endpoint
//!
//! `resolve` is pure configuration mapping; no network I/O happens here.
//! The gmail and outlook rows are pinned to the well-known submission
//! endpoints for those services.

use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, Tokio1Executor};

use crate::errors::EmailError;
use crate::settings::ProviderSettings;

pub const GMAIL_HOST: &str = "smtp.gmail.com";
pub const OUTLOOK_HOST: &str = "smtp-mail.outlook.com";
pub const SENDGRID_HOST: &str = "smtp.sendgrid.net";
pub const MAILGUN_HOST: &str = "smtp.mailgun.org";

const SUBMISSION_PORT: u16 = 587;
const SMTPS_PORT: u16 = 465;

/// Provider-agnostic SMTP connection descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    /// Wrapper TLS (SMTPS) when true, STARTTLS when false
    pub secure: bool,
    pub user: String,
    pub pass: String,
}

/// Map resolved provider settings onto the SMTP endpoint for that provider.
pub fn resolve(settings: &ProviderSettings) -> TransportConfig {
    match settings {
        ProviderSettings::Smtp {
            host,
            port,
            secure,
            user,
            pass,
        } => TransportConfig {
            host: host.clone(),
            port: *port,
            secure: *secure,
            user: user.clone(),
            pass: pass.clone(),
        },
        ProviderSettings::Gmail { user, pass } => TransportConfig {
            host: GMAIL_HOST.to_string(),
            port: SMTPS_PORT,
            secure: true,
            user: user.clone(),
            pass: pass.clone(),
        },
        ProviderSettings::Outlook { user, pass } => TransportConfig {
            host: OUTLOOK_HOST.to_string(),
            port: SUBMISSION_PORT,
            secure: false,
            user: user.clone(),
            pass: pass.clone(),
        },
        ProviderSettings::Sendgrid { api_key } => TransportConfig {
            host: SENDGRID_HOST.to_string(),
            port: SUBMISSION_PORT,
            secure: false,
            user: "apikey".to_string(),
            pass: api_key.clone(),
        },
        ProviderSettings::Mailgun { api_key, domain } => TransportConfig {
            host: MAILGUN_HOST.to_string(),
            port: SUBMISSION_PORT,
            secure: false,
            user: format!("postmaster@{}", domain),
            pass: api_key.clone(),
        },
    }
}

/// Build a fresh async SMTP transport for the given endpoint.
///
/// `secure` selects wrapper TLS on connect; otherwise the plain connection
/// is upgraded via opportunistic STARTTLS.
pub fn build_smtp_transport(
    config: &TransportConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    let tls_parameters =
        TlsParameters::new(config.host.clone()).map_err(|e| EmailError::Transport(e.to_string()))?;
    let tls = if config.secure {
        Tls::Wrapper(tls_parameters)
    } else {
        Tls::Opportunistic(tls_parameters)
    };

    Ok(
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .tls(tls)
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_smtp_passes_settings_through() {
        let config = resolve(&ProviderSettings::Smtp {
            host: "mail.internal.example".to_string(),
            port: 2525,
            secure: true,
            user: "mailer@example.com".to_string(),
            pass: "secret".to_string(),
        });

        assert_eq!(
            config,
            TransportConfig {
                host: "mail.internal.example".to_string(),
                port: 2525,
                secure: true,
                user: "mailer@example.com".to_string(),
                pass: "secret".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_gmail() {
        let config = resolve(&ProviderSettings::Gmail {
            user: "someone@gmail.com".to_string(),
            pass: "app-password".to_string(),
        });

        assert_eq!(config.host, "smtp.gmail.com");
        assert_eq!(config.port, 465);
        assert!(config.secure);
        assert_eq!(config.user, "someone@gmail.com");
        assert_eq!(config.pass, "app-password");
    }

    #[test]
    fn test_resolve_outlook() {
        let config = resolve(&ProviderSettings::Outlook {
            user: "someone@outlook.com".to_string(),
            pass: "pass".to_string(),
        });

        assert_eq!(config.host, "smtp-mail.outlook.com");
        assert_eq!(config.port, 587);
        assert!(!config.secure);
        assert_eq!(config.user, "someone@outlook.com");
    }

    #[test]
    fn test_resolve_sendgrid_uses_literal_apikey_user() {
        let config = resolve(&ProviderSettings::Sendgrid {
            api_key: "SG.abc123".to_string(),
        });

        assert_eq!(config.host, "smtp.sendgrid.net");
        assert_eq!(config.port, 587);
        assert!(!config.secure);
        assert_eq!(config.user, "apikey");
        assert_eq!(config.pass, "SG.abc123");
    }

    #[test]
    fn test_resolve_mailgun_builds_postmaster_user() {
        let config = resolve(&ProviderSettings::Mailgun {
            api_key: "x".to_string(),
            domain: "example.com".to_string(),
        });

        assert_eq!(config.host, "smtp.mailgun.org");
        assert_eq!(config.port, 587);
        assert!(!config.secure);
        assert_eq!(config.user, "postmaster@example.com");
        assert_eq!(config.pass, "x");
    }

    #[tokio::test]
    async fn test_build_smtp_transport_accepts_both_tls_modes() {
        let mut config = TransportConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            user: "mailer@example.com".to_string(),
            pass: "secret".to_string(),
        };
        assert!(build_smtp_transport(&config).is_ok());

        config.secure = true;
        config.port = 465;
        assert!(build_smtp_transport(&config).is_ok());
    }
}
