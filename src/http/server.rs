//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Guard protected routes with the session middleware
//! - Bind server to listener and shut down gracefully

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::middleware::session_auth_middleware;
use crate::auth::{OtpThrottle, SessionSigner, SmsClient, SmsError};
use crate::config::AppConfig;
use crate::http::handlers::{auth, dashboard, invoices, records};
use crate::sheets::{SheetsClient, SheetsError};

/// Errors during server construction and startup.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Sheets(#[from] SheetsError),

    #[error(transparent)]
    Sms(#[from] SmsError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sheets: SheetsClient,
    pub sms: SmsClient,
    pub sessions: Arc<SessionSigner>,
    pub otp_throttle: Arc<OtpThrottle>,
}

/// HTTP server for the FeeFlow API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let state = AppState {
            sheets: SheetsClient::new(config.sheets.clone())?,
            sms: SmsClient::new(config.sms.clone())?,
            sessions: Arc::new(SessionSigner::new(&config.session)),
            otp_throttle: Arc::new(OtpThrottle::new(&config.rate_limit)),
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let protected = Router::new()
            .route("/api/auth/session", get(auth::session))
            .route("/api/invoices", post(invoices::create).get(invoices::list))
            .route("/api/invoices/{id}", get(invoices::get))
            .route("/api/invoices/{id}/status", put(invoices::update_status))
            .route(
                "/api/students",
                get(records::list_students).post(records::create_student),
            )
            .route("/api/students/classes", get(records::list_classes))
            .route("/api/students/{id}", get(records::get_student))
            .route("/api/teachers", get(records::list_teachers))
            .route(
                "/api/claims",
                get(records::list_claims).post(records::create_claim),
            )
            .route("/api/members", get(records::list_members))
            .route("/api/dashboard", get(dashboard::stats))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                session_auth_middleware,
            ));

        Router::new()
            .route("/health", get(health))
            .route("/api/auth/login", post(auth::login))
            .route("/api/auth/otp/send", post(auth::otp_send))
            .route("/api/auth/otp/verify", post(auth::otp_verify))
            .route("/api/auth/logout", post(auth::logout))
            .merge(protected)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[derive(serde::Serialize)]
struct HealthStatus {
    version: &'static str,
    status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
