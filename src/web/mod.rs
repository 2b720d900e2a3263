//! Web server for the taxi-glance dashboard.
//!
//! One page with a query selector, a form endpoint that renders results, and
//! a small JSON mirror of the same data.

pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{GlanceError, Result};
use crate::query::QueryExecutor;

/// State that's passed to all handlers.
#[derive(Debug)]
pub struct AppState {
    /// Runs catalog queries against the configured backend.
    pub executor: QueryExecutor,
}

/// Builds the dashboard router.
pub fn router(executor: QueryExecutor) -> Router {
    let state = Arc::new(AppState { executor });

    Router::new()
        .route("/", get(handlers::index))
        .route("/query", post(handlers::run_query_form))
        .route("/api/queries", get(handlers::list_queries))
        .route("/api/queries/:name", get(handlers::run_query_api))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the given address.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| GlanceError::config(format!("Cannot listen on {addr}: {e}")))
}

/// Serves the dashboard on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, executor: QueryExecutor) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Dashboard listening on http://{addr}");
    }

    axum::serve(listener, router(executor))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GlanceError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        // No signal handler: serve until the process is killed.
        Err(_) => std::future::pending::<()>().await,
    }
}
