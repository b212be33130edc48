//! Browser transport for the auth service.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net` to the same-origin
//! auth proxy, so the browser attaches and stores the session cookies.
//! Server-side (SSR): a stub that fails every call, since session state is
//! only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every HTTP status is handed back as a `RawResponse`; only a request that
//! produced no response becomes `AuthFailure::Unexpected`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use authflow::client::{Endpoint, RawResponse, Transport};
use authflow::{AuthFailure, HttpAuthClient};
use serde_json::Value;

/// The auth client every page uses.
pub type BrowserClient = HttpAuthClient<BrowserTransport>;

/// Message returned by the SSR stub.
pub const NOT_AVAILABLE_ON_SERVER: &str = "not available on server";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserTransport {
    base_path: String,
}

impl BrowserTransport {
    pub fn new(base_path: &str) -> Self {
        Self { base_path: base_path.trim_end_matches('/').to_owned() }
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn url(&self, endpoint: Endpoint) -> String {
        endpoint.url(&self.base_path)
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(endpoint: Endpoint, detail: &str) -> String {
    format!("{} request failed: {detail}", endpoint.path())
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<RawResponse, AuthFailure> {
        #[cfg(feature = "hydrate")]
        {
            use authflow::client::Method;
            use gloo_net::http::Request;

            let url = self.url(endpoint);
            let unexpected =
                |e: gloo_net::Error| AuthFailure::Unexpected(request_failed_message(endpoint, &e.to_string()));

            let builder = match endpoint.method() {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
            };
            let resp = match body {
                Some(body) => builder.json(&body).map_err(unexpected)?.send().await.map_err(unexpected)?,
                None => builder.send().await.map_err(unexpected)?,
            };
            let status = resp.status();
            let text = resp.text().await.map_err(unexpected)?;
            Ok(RawResponse { status, body: text })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (endpoint, body);
            Err(AuthFailure::Unexpected(NOT_AVAILABLE_ON_SERVER.to_owned()))
        }
    }
}
