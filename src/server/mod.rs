//! HTTP server: router assembly and the serve loop
//!
//! The router is plain data wiring: every route hands off to a handler in
//! [`handlers`], and the state is built once from a store and a
//! revalidation bus. [`serve`] binds, serves, and drains on SIGTERM or
//! Ctrl+C.

pub mod handlers;

pub use handlers::AppState;

use anyhow::Result;
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/dashboard/invoices",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route("/dashboard/invoices/pages", get(handlers::invoice_pages))
        .route("/dashboard/invoices/latest", get(handlers::latest_invoices))
        .route(
            "/dashboard/invoices/{id}",
            get(handlers::get_invoice)
                .put(handlers::update_invoice)
                .delete(handlers::delete_invoice),
        )
        .route("/dashboard/revenue", get(handlers::revenue))
        .route("/dashboard/cards", get(handlers::cards))
        .route("/dashboard/customers", get(handlers::list_customers))
        .route("/dashboard/customers/table", get(handlers::customer_table))
        .route("/login", post(handlers::login))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the application with graceful shutdown
///
/// Binds to `addr`, serves until SIGTERM or Ctrl+C, then drains in-flight
/// requests before returning.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
