//! HTTP transport for the wallet service.
//!
//! Handlers hand raw path and body strings to [`WalletService`] so that
//! validation and failure classification stay in the service. This layer
//! only picks a status code from the classified outcome.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::application::{ErrorKind, WalletService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WalletService>,
}

impl AppState {
    pub fn new(service: WalletService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the router with all wallet routes.
///
/// # Routes
/// - `GET  /health` - liveness probe
/// - `GET  /wallet/:wallet_id` - read balance
/// - `GET  /wallet/` - empty id, reported as a malformed identifier
/// - `POST /wallet` - deposit or withdraw
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/wallet", post(handlers::change_balance))
        .route("/wallet/", get(handlers::get_balance_empty_id))
        .route("/wallet/:wallet_id", get(handlers::get_balance))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Status code the transport reports for a classified outcome.
pub fn status_for(kind: Option<ErrorKind>) -> StatusCode {
    match kind {
        None => StatusCode::OK,
        Some(ErrorKind::WalletNotFound) => StatusCode::NOT_FOUND,
        Some(ErrorKind::UnexpectedError) => StatusCode::INTERNAL_SERVER_ERROR,
        Some(
            ErrorKind::MalformedPayload
            | ErrorKind::MalformedIdentifier
            | ErrorKind::MalformedAmount
            | ErrorKind::InsufficientFunds
            | ErrorKind::UnsupportedOperation,
        ) => StatusCode::BAD_REQUEST,
    }
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local_addr = listener.local_addr().context("Failed to read local address")?;
    tracing::info!(%local_addr, "wallet service listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("wallet service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
