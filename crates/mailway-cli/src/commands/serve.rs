//! HTTP server command

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use clap::Args;
use mailway_core::api;
use mailway_email::handlers::{self, AppState, MailApiDoc};
use mailway_email::MailerService;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "MAILWAY_ADDRESS")]
    pub address: String,

    /// Deadline in seconds for each verify/dispatch round-trip
    #[arg(long, default_value_t = 30, env = "MAILWAY_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Bearer token required on every request; routes are unauthenticated
    /// when unset
    #[arg(long, env = "MAILWAY_API_KEY")]
    pub api_key: Option<String>,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.serve())
    }

    async fn serve(self) -> anyhow::Result<()> {
        let mailer = Arc::new(MailerService::smtp(Duration::from_secs(
            self.request_timeout_secs,
        )));
        let state = Arc::new(AppState { mailer });

        let mut app: Router = handlers::configure_routes()
            .with_state(state)
            .merge(swagger_router())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        if let Some(api_key) = self.api_key {
            info!("API key authentication enabled");
            app = app.layer(middleware::from_fn_with_state(
                Arc::new(api_key),
                require_api_key,
            ));
        }

        let listener = TcpListener::bind(&self.address).await?;
        info!("Mailway server listening on {}", self.address);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

fn swagger_router() -> Router {
    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", MailApiDoc::openapi()),
    )
}

/// Reject requests that do not carry the configured bearer token.
async fn require_api_key(
    State(expected): State<Arc<String>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token == expected.as_str())
        .unwrap_or(false);

    if authorized {
        next.run(request).await
    } else {
        api::unauthorized().into_response()
    }
}
