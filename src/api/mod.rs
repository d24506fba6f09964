//! REST surface consumed by the dashboard frontend.

pub mod routes;

use crate::core::config::AppConfig;
use crate::core::error::FetchError;
use crate::service::StatementService;
use anyhow::{Context, Result};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: StatementService,
}

/// Failure answered by a handler.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Fetch(FetchError),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Fetch(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            ApiError::Fetch(err) => (
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY),
                err.kind(),
                err.to_string(),
            ),
        };
        let body = Json(serde_json::json!({
            "error": kind,
            "message": message,
        }));
        (status, body).into_response()
    }
}

pub fn router(service: StatementService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/financial/:kind/:symbol",
            get(routes::financial_statement),
        )
        .route(
            "/api/alphavantage/:kind/:symbol",
            get(routes::alphavantage_statement),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { service })
}

/// Runs the API server until Ctrl-C.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let service = StatementService::from_config(config)?;
    let app = router(service);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid server address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("findash v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Server error")
}
