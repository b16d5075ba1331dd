//! HTTP API
//!
//! Exposes the shared ledger over JSON: script submission, direct commits,
//! chain listing, wallet and integrity checks. Every handler gets the ledger
//! through `AppState`; nothing here is process-global.

pub mod routes;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use log::info;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::Settings;
use crate::core::SharedLedger;
use crate::error::{LedgerError, Result};

/// Shared application state passed to axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: SharedLedger,
}

async fn log_request(req: Request, next: Next) -> Response {
    info!("{} {}", req.method(), req.uri().path());
    next.run(req).await
}

pub fn router(ledger: SharedLedger, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/contract", post(routes::run_contract))
        .route("/commit", post(routes::commit))
        .route("/blockchain", get(routes::list_blocks))
        .route("/wallet", get(routes::wallet))
        .route("/validate", get(routes::validate_chain))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(middleware::from_fn(log_request))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .with_state(AppState { ledger })
}

/// Bind `settings.listen_addr` and serve until the process exits
pub async fn serve(settings: &Settings, ledger: SharedLedger) -> Result<()> {
    let addr: SocketAddr = settings.listen_addr.parse().map_err(|e| {
        LedgerError::Config(format!("Invalid listen address {}: {e}", settings.listen_addr))
    })?;
    let app = router(ledger, Duration::from_secs(settings.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Bharat Chain backend running at http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
