//! Server Implementation
//!
//! Router assembly, HTTP serving, background task lifecycle.

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{BackgroundTasks, Config, ServerState};
use crate::notify::NotificationWorker;

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the server until ctrl-c
    ///
    /// Starts the notification worker first, then serves HTTP; on shutdown
    /// the worker gets a bounded grace period to drain.
    pub async fn run(&self) -> anyhow::Result<()> {
        let (state, notify_rx) = ServerState::initialize(&self.config).await;

        let mut tasks = BackgroundTasks::new();
        let worker = NotificationWorker::new(state.pool.clone(), state.settings.clone());
        let shutdown_token = tasks.shutdown_token();
        tasks.spawn("notification_worker", worker.run(notify_rx, shutdown_token));

        let app = build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Storefront server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        tasks
            .shutdown(Duration::from_millis(self.config.shutdown_timeout_ms))
            .await;

        Ok(())
    }
}

/// Assemble the application router
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .merge(api::health::router())
        .merge(api::orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
