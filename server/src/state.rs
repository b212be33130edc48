//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! server keeps no session state of its own; it holds the outbound HTTP
//! client used by the auth proxy and the upstream base URL.

use std::sync::Arc;

use crate::config::ServerConfig;

/// Clone is required by Axum; inner fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub auth_base_url: Arc<str>,
}

impl AppState {
    /// Build the proxy client from `config`.
    ///
    /// Redirects are relayed to the browser rather than followed, and no
    /// cookie store is kept: cookies belong to the browser.
    pub fn new(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.proxy_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http, auth_base_url: Arc::from(config.auth_base_url.as_str()) })
    }
}
