//! REST API over a loaded record collection.
//!
//! Every endpoint is a GET that applies optional filter query parameters
//! before computing its result:
//! - `/summary`, `/daily`, `/monthly`, `/hourly`: rollups and aggregates
//! - `/analytics`: summary plus all five analyses
//! - `/records`: the filtered records themselves

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::AnalysisConfig;
use crate::data::SolarDataPoint;

pub use types::{AnalyticsResponse, ErrorResponse, FilterQuery};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after records are loaded and wrapped in `Arc`;
/// no locks are needed since all data is read-only.
pub struct AppState {
    /// Configuration providing the analytics parameters.
    pub config: AnalysisConfig,
    /// Derived records, before any request filter.
    pub records: Vec<SolarDataPoint>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/daily", get(handlers::get_daily))
        .route("/monthly", get(handlers::get_monthly))
        .route("/hourly", get(handlers::get_hourly))
        .route("/analytics", get(handlers::get_analytics))
        .route("/records", get(handlers::get_records))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
