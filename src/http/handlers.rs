use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::application::WalletResponse;

use super::{AppState, status_for};

/// Health check endpoint for liveness probes.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /wallet/:wallet_id
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> (StatusCode, Json<WalletResponse>) {
    respond(state.service.get_balance(&wallet_id).await)
}

/// GET /wallet/
pub async fn get_balance_empty_id(
    State(state): State<AppState>,
) -> (StatusCode, Json<WalletResponse>) {
    respond(state.service.get_balance("").await)
}

/// POST /wallet
///
/// The body is taken as raw bytes so malformed JSON and invalid UTF-8 both
/// reach the service and come back as a `WalletResponse`, not as an
/// extractor rejection.
pub async fn change_balance(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<WalletResponse>) {
    respond(state.service.change_balance_bytes(&body).await)
}

fn respond(response: WalletResponse) -> (StatusCode, Json<WalletResponse>) {
    (status_for(response.error_kind), Json(response))
}
