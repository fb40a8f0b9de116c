//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the users handlers
//! - Wrap it in the request pipeline
//! - Serve on a listener until the shutdown signal fires

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::AuthState;
use crate::http::pipeline;
use crate::users::{SharedStore, UserStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

/// HTTP server for the user service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    store: SharedStore,
}

impl HttpServer {
    /// Create a new HTTP server with an empty store.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_store(config, UserStore::shared())
    }

    /// Create a server around an existing store.
    pub fn with_store(config: ServiceConfig, store: SharedStore) -> Self {
        let state = AppState {
            store: store.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            store,
        }
    }

    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let auth = AuthState::new(config.authentication.token.as_str());
        let users = handlers::routes(config.limits.max_body_size).with_state(state);
        pipeline::apply(users, auth)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
