//! Shared helpers for client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use cadet_console_client::{ResourceEndpoint, RestResourceClient, StaticToken, TokenSource};
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// A client that bypasses any proxy configured in the environment.
pub fn client_for(
    base_url: &str,
    endpoint: ResourceEndpoint,
    token: Option<&str>,
) -> RestResourceClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build reqwest client");
    let tokens: Arc<dyn TokenSource> = match token {
        Some(t) => Arc::new(StaticToken::new(t)),
        None => Arc::new(StaticToken::none()),
    };
    RestResourceClient::with_client(http, base_url, endpoint, tokens)
}

/// Schools endpoint as the school backend exposes it.
pub fn schools_endpoint() -> ResourceEndpoint {
    ResourceEndpoint::rest("schools").with_stats("/schools/stats/")
}

/// Unwrap an Ok or fail with the error's display text.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {e}"),
        }
    };
}
