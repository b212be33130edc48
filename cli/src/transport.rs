//! `reqwest` transport for the hosted auth service.
//!
//! One client per process with a cookie jar, so the session cookie set by a
//! sign-in is sent with every later call, and a fixed `Origin` header, which
//! the service checks on state-changing requests.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use async_trait::async_trait;
use authflow::AuthFailure;
use authflow::client::{Endpoint, Method, RawResponse, Transport};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN};
use serde_json::Value;

use crate::CliError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport rooted at `base_url`. `origin` defaults to the
    /// scheme and authority of `base_url`.
    pub fn new(base_url: &str, origin: Option<&str>) -> Result<Self, CliError> {
        let base_url = validate_base_url(base_url)?;
        let origin = match origin {
            Some(origin) => origin.trim_end_matches('/').to_owned(),
            None => origin_of(&base_url),
        };

        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_str(&origin)?);

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        tracing::debug!(%base_url, %origin, "auth transport ready");
        Ok(Self { http, base_url })
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<RawResponse, AuthFailure> {
        let url = endpoint.url(&self.base_url);
        let request = match endpoint.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| AuthFailure::Unexpected(format!("request failed: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthFailure::Unexpected(format!("reading response failed: {e}")))?;

        tracing::debug!(endpoint = endpoint.path(), status, "auth response");
        Ok(RawResponse { status, body })
    }
}

/// Accept only `http(s)` base URLs with a host, trailing slash removed.
pub fn validate_base_url(base_url: &str) -> Result<String, CliError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| CliError::InvalidBaseUrl(base_url.to_owned()))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(CliError::InvalidBaseUrl(base_url.to_owned()));
    }
    Ok(trimmed.to_owned())
}

/// `scheme://authority` of an already validated URL.
pub fn origin_of(url: &str) -> String {
    let (scheme, rest) = url.split_once("://").unwrap_or(("https", url));
    let authority = rest.split('/').next().unwrap_or(rest);
    format!("{scheme}://{authority}")
}
