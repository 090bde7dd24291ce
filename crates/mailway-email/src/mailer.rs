//! Mail transports and the dispatch service
//!
//! [`MailTransport`] is the seam between the service and the wire: the
//! real implementation speaks SMTP through lettre, the mock counts calls
//! for tests. [`MailerService`] owns the request flow — resolve settings,
//! verify connectivity, build the message, dispatch — with a deadline on
//! every network round-trip.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::{AsyncTransport, Message};
use tracing::info;

use crate::errors::EmailError;
use crate::message::{self, OutboundMessage, SendRequest, TestSendRequest};
use crate::settings::ProviderSettings;
use crate::transport::{self, TransportConfig};

/// Outcome of a successful dispatch
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// Message-ID carried by the dispatched email
    pub message_id: String,
}

/// Transport abstraction: connection verification and message dispatch
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Open a connection and complete the EHLO/auth handshake.
    async fn verify(&self, config: &TransportConfig) -> Result<(), EmailError>;

    /// Hand one message to the provider.
    async fn dispatch(&self, config: &TransportConfig, message: Message)
        -> Result<(), EmailError>;
}

/// SMTP transport backed by lettre.
///
/// A fresh connection is made per call; nothing is pooled across requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailTransport;

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn verify(&self, config: &TransportConfig) -> Result<(), EmailError> {
        let mailer = transport::build_smtp_transport(config)?;
        match mailer.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(EmailError::Verification(format!(
                "{}:{} did not accept the connection handshake",
                config.host, config.port
            ))),
            Err(err) => Err(EmailError::Verification(err.to_string())),
        }
    }

    async fn dispatch(
        &self,
        config: &TransportConfig,
        message: Message,
    ) -> Result<(), EmailError> {
        let mailer = transport::build_smtp_transport(config)?;
        mailer
            .send(message)
            .await
            .map_err(|err| EmailError::Dispatch(err.to_string()))?;
        Ok(())
    }
}

/// Mock transport for tests: counts calls, optionally fails
#[derive(Debug, Clone, Default)]
pub struct MockMailTransport {
    pub verify_count: Arc<AtomicUsize>,
    pub dispatch_count: Arc<AtomicUsize>,
    pub fail_verify: bool,
    pub fail_dispatch: bool,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verify_failure(mut self) -> Self {
        self.fail_verify = true;
        self
    }

    pub fn with_dispatch_failure(mut self) -> Self {
        self.fail_dispatch = true;
        self
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_count.load(Ordering::SeqCst)
    }

    pub fn dispatch_calls(&self) -> usize {
        self.dispatch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn verify(&self, _config: &TransportConfig) -> Result<(), EmailError> {
        self.verify_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_verify {
            return Err(EmailError::Verification(
                "mock verification failure".to_string(),
            ));
        }
        Ok(())
    }

    async fn dispatch(
        &self,
        _config: &TransportConfig,
        _message: Message,
    ) -> Result<(), EmailError> {
        self.dispatch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_dispatch {
            return Err(EmailError::Dispatch("mock dispatch failure".to_string()));
        }
        Ok(())
    }
}

/// Dispatch service: resolve, verify, build, send
pub struct MailerService {
    transport: Arc<dyn MailTransport>,
    deadline: Duration,
}

impl MailerService {
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

    pub fn new(transport: Arc<dyn MailTransport>, deadline: Duration) -> Self {
        Self {
            transport,
            deadline,
        }
    }

    /// Service backed by the real SMTP transport.
    pub fn smtp(deadline: Duration) -> Self {
        Self::new(Arc::new(SmtpMailTransport), deadline)
    }

    async fn with_deadline<T>(
        &self,
        stage: &'static str,
        fut: impl std::future::Future<Output = Result<T, EmailError>>,
    ) -> Result<T, EmailError> {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(EmailError::Timeout {
                stage,
                secs: self.deadline.as_secs(),
            }),
        }
    }

    /// Verify connectivity and dispatch one message.
    pub async fn send(&self, request: SendRequest) -> Result<SendOutcome, EmailError> {
        let provider = request.settings.kind();
        let config = transport::resolve(&request.settings);

        self.with_deadline("connection verification", self.transport.verify(&config))
            .await?;

        let OutboundMessage {
            message,
            message_id,
        } = message::build_message(&request)?;
        self.with_deadline("dispatch", self.transport.dispatch(&config, message))
            .await?;

        info!(
            message_id = %message_id,
            to = %request.to,
            subject = %request.subject,
            provider = %provider,
            "email dispatched"
        );
        Ok(SendOutcome { message_id })
    }

    /// Verify connectivity only; no message is sent.
    pub async fn test_connection(&self, settings: &ProviderSettings) -> Result<(), EmailError> {
        let config = transport::resolve(settings);
        self.with_deadline("connection verification", self.transport.verify(&config))
            .await
    }

    /// Verify connectivity and dispatch the fixed-template test message.
    pub async fn send_test(&self, request: TestSendRequest) -> Result<SendOutcome, EmailError> {
        let provider = request.settings.kind();
        let config = transport::resolve(&request.settings);

        self.with_deadline("connection verification", self.transport.verify(&config))
            .await?;

        let OutboundMessage {
            message,
            message_id,
        } = message::build_test_message(&request)?;
        self.with_deadline("dispatch", self.transport.dispatch(&config, message))
            .await?;

        info!(
            message_id = %message_id,
            to = %request.to,
            provider = %provider,
            "test email dispatched"
        );
        Ok(SendOutcome { message_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DEFAULT_TEST_SENDER_ADDRESS, DEFAULT_TEST_SENDER_NAME};

    fn send_request() -> SendRequest {
        SendRequest {
            to: "learner@example.com".parse().unwrap(),
            subject: "Welcome".to_string(),
            html: "<p>Welcome</p>".to_string(),
            text: "Welcome".to_string(),
            from_name: "Course Updates".to_string(),
            from_address: "no-reply@example.com".parse().unwrap(),
            reply_to: None,
            settings: ProviderSettings::Smtp {
                host: "smtp.example.com".to_string(),
                port: 587,
                secure: false,
                user: "mailer@example.com".to_string(),
                pass: "secret".to_string(),
            },
        }
    }

    fn service_with(mock: MockMailTransport) -> MailerService {
        MailerService::new(Arc::new(mock), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_send_verifies_then_dispatches() {
        let mock = MockMailTransport::new();
        let service = service_with(mock.clone());

        let outcome = service.send(send_request()).await.unwrap();

        assert!(outcome.message_id.starts_with('<'));
        assert_eq!(mock.verify_calls(), 1);
        assert_eq!(mock.dispatch_calls(), 1);
    }

    #[tokio::test]
    async fn test_verification_failure_short_circuits_dispatch() {
        let mock = MockMailTransport::new().with_verify_failure();
        let service = service_with(mock.clone());

        let err = service.send(send_request()).await.unwrap_err();

        assert!(matches!(err, EmailError::Verification(_)));
        assert_eq!(mock.verify_calls(), 1);
        assert_eq!(mock.dispatch_calls(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_failure_surfaces() {
        let mock = MockMailTransport::new().with_dispatch_failure();
        let service = service_with(mock.clone());

        let err = service.send(send_request()).await.unwrap_err();

        assert!(matches!(err, EmailError::Dispatch(_)));
        assert_eq!(mock.dispatch_calls(), 1);
    }

    #[tokio::test]
    async fn test_test_connection_sends_nothing() {
        let mock = MockMailTransport::new();
        let service = service_with(mock.clone());

        let settings = ProviderSettings::Mailgun {
            api_key: "x".to_string(),
            domain: "example.com".to_string(),
        };
        service.test_connection(&settings).await.unwrap();

        assert_eq!(mock.verify_calls(), 1);
        assert_eq!(mock.dispatch_calls(), 0);
    }

    #[tokio::test]
    async fn test_send_test_uses_template() {
        let mock = MockMailTransport::new();
        let service = service_with(mock.clone());

        let outcome = service
            .send_test(TestSendRequest {
                to: "admin@example.com".parse().unwrap(),
                from_name: DEFAULT_TEST_SENDER_NAME.to_string(),
                from_address: DEFAULT_TEST_SENDER_ADDRESS.parse().unwrap(),
                settings: ProviderSettings::Sendgrid {
                    api_key: "SG.abc".to_string(),
                },
            })
            .await
            .unwrap();

        assert!(outcome.message_id.ends_with("@example.com>"));
        assert_eq!(mock.verify_calls(), 1);
        assert_eq!(mock.dispatch_calls(), 1);
    }

    struct StalledTransport;

    #[async_trait]
    impl MailTransport for StalledTransport {
        async fn verify(&self, _config: &TransportConfig) -> Result<(), EmailError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn dispatch(
            &self,
            _config: &TransportConfig,
            _message: Message,
        ) -> Result<(), EmailError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_deadline_bounds_a_stalled_verify() {
        let service = MailerService::new(Arc::new(StalledTransport), Duration::from_millis(50));

        let err = service.send(send_request()).await.unwrap_err();

        assert!(matches!(
            err,
            EmailError::Timeout {
                stage: "connection verification",
                ..
            }
        ));
    }
}
