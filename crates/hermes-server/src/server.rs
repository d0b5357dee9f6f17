use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;
use hermes_inbox::{InboxService, NotificationRepository};
use hermes_store::{KeyValueStore, RedbKvStore};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::context::ContextPolicy;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::router::{build_app, build_router};

/// Hermes inbox server.
pub struct HermesServer {
    config: ServerConfig,
}

impl HermesServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Validate the configuration and wire the inbox service over `store`.
    pub fn state(&self, store: Arc<dyn KeyValueStore>) -> ServerResult<AppState> {
        let resolver = self.config.validate()?;
        let repository =
            NotificationRepository::new(store).with_page_size(self.config.max_page_size);
        Ok(AppState {
            service: Arc::new(InboxService::new(repository, resolver)),
            policy: ContextPolicy::from_config(&self.config),
            request_timeout: self.config.request_timeout(),
        })
    }

    /// Build the router over `store` (useful for testing).
    pub fn router(&self, store: Arc<dyn KeyValueStore>) -> ServerResult<axum::Router> {
        Ok(build_router(self.state(store)?, self.config.max_body_bytes))
    }

    /// Open the durable store and serve requests until ctrl-c or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        self.config.validate()?;
        let store = RedbKvStore::open(&self.config.storage_path)?;
        let router = self.router(Arc::new(store))?;
        let app = build_app(router);

        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            storage = %self.config.storage_path.display(),
            "hermes server listening"
        );
        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("hermes server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
