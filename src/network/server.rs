//! HTTP Server
//!
//! Builds the router and serves it until shutdown.

use std::future::Future;

use axum::extract::Extension;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{
    ENDPOINT_ADD, ENDPOINT_DELETE, ENDPOINT_LIST_ALL, ENDPOINT_LIST_COMPATIBLE, ENDPOINT_READ,
    ENDPOINT_UPDATE,
};
use crate::service::PartsService;

use super::handlers::{
    handle_add, handle_delete, handle_list_all, handle_list_compatible, handle_read,
    handle_update, AppContext,
};

/// HTTP server for the parts service
pub struct Server {
    config: Config,
    service: PartsService,
}

impl Server {
    /// Create a new server with the given config and service
    pub fn new(config: Config, service: PartsService) -> Self {
        Self { config, service }
    }

    /// The routes, with the service attached
    pub fn router(&self) -> Router {
        let ctx = AppContext::new(self.service.clone(), self.config.request_timeout());

        Router::new()
            .route(ENDPOINT_ADD, post(handle_add))
            .route(ENDPOINT_READ, post(handle_read))
            .route(ENDPOINT_UPDATE, post(handle_update))
            .route(ENDPOINT_DELETE, post(handle_delete))
            .route(ENDPOINT_LIST_ALL, get(handle_list_all))
            .route(ENDPOINT_LIST_COMPATIBLE, post(handle_list_compatible))
            .layer(Extension(ctx))
    }

    /// Bind `listen_addr` and serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr.as_str()).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("HTTP server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown..."),
        Err(e) => {
            tracing::warn!("Could not listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
