//! Same-origin proxy to the hosted auth service.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser talks to `/api/auth/*` on this server so session cookies are
//! first-party. Each request is forwarded verbatim to `NEON_AUTH_BASE_URL`
//! with a small allow-list of request headers; status, body and the
//! allow-listed response headers come back unchanged, except that cookie
//! `Domain` attributes are dropped so the browser scopes them to this host.
//!
//! ERROR HANDLING
//! ==============
//! Upstream error statuses are relayed as-is. Only transport failures (no
//! response, timeout, unreadable body) become `502` with `{"message": ...}`.

#[cfg(test)]
#[path = "auth_proxy_test.rs"]
mod auth_proxy_test;

use axum::body::{Body, Bytes};
use axum::extract::{Path, RawQuery, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue, LOCATION, ORIGIN, SET_COOKIE, USER_AGENT};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use crate::state::AppState;

/// Request headers copied to the upstream call.
const FORWARDED_REQUEST_HEADERS: [HeaderName; 4] = [CONTENT_TYPE, COOKIE, ORIGIN, USER_AGENT];

/// Response headers copied back to the browser.
const RELAYED_RESPONSE_HEADERS: [HeaderName; 3] = [CONTENT_TYPE, SET_COOKIE, LOCATION];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("auth service unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "auth proxy failed");
        let body = serde_json::json!({ "message": self.to_string() });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

/// `GET|POST /api/auth/{*path}`: forward to the hosted auth service.
pub async fn proxy(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let url = upstream_url(&state.auth_base_url, &path, query.as_deref());
    tracing::debug!(%method, %path, "proxying auth request");

    let upstream = state
        .http
        .request(method, url)
        .headers(forward_headers(&headers))
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let relayed = relay_headers(upstream.headers());
    let body = upstream.bytes().await?;
    tracing::debug!(%path, status = status.as_u16(), "auth response relayed");

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = relayed;
    Ok(response)
}

/// `base` + `/path` + `?query`, with exactly one slash at the join.
pub(crate) fn upstream_url(base: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

pub(crate) fn forward_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in FORWARDED_REQUEST_HEADERS {
        for value in incoming.get_all(&name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

pub(crate) fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in RELAYED_RESPONSE_HEADERS {
        for value in upstream.get_all(&name) {
            let value = if name == SET_COOKIE { first_party_cookie(value) } else { value.clone() };
            out.append(name.clone(), value);
        }
    }
    out
}

/// Drop the `Domain` attribute from a `Set-Cookie` value.
pub(crate) fn first_party_cookie(value: &HeaderValue) -> HeaderValue {
    let Ok(raw) = value.to_str() else {
        return value.clone();
    };
    let kept: Vec<&str> = raw
        .split(';')
        .map(str::trim)
        .filter(|attr| !attr.get(..7).is_some_and(|prefix| prefix.eq_ignore_ascii_case("domain=")))
        .collect();
    HeaderValue::from_str(&kept.join("; ")).unwrap_or_else(|_| value.clone())
}
