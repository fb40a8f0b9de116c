//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use reqwest::{Client, RequestBuilder};
use tokio::net::TcpListener;
use user_management::config::ServiceConfig;
use user_management::users::SharedStore;
use user_management::{HttpServer, Shutdown};

pub const TOKEN: &str = "test-token";

/// A running service bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: SharedStore,
    pub client: Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.authentication.token = TOKEN.into();

        let server = HttpServer::new(config);
        let store = server.store();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = Client::builder().no_proxy().build().unwrap();

        Self {
            addr,
            store,
            client,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request builder carrying the valid bearer token.
    pub fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(TOKEN)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
