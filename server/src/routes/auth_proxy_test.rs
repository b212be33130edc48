use std::time::Duration;

use axum::Router;
use axum::http::Request;
use axum::routing::{get, post};
use tower::ServiceExt;

use super::*;
use crate::config::ServerConfig;

// =============================================================================
// upstream_url
// =============================================================================

#[test]
fn upstream_url_joins_with_single_slash() {
    assert_eq!(upstream_url("https://a.example/auth/", "/get-session", None), "https://a.example/auth/get-session");
    assert_eq!(upstream_url("https://a.example/auth", "sign-in/email", None), "https://a.example/auth/sign-in/email");
}

#[test]
fn upstream_url_keeps_query() {
    assert_eq!(
        upstream_url("https://a.example/auth", "reset-password/abc", Some("callbackURL=%2F")),
        "https://a.example/auth/reset-password/abc?callbackURL=%2F"
    );
    assert_eq!(upstream_url("https://a.example/auth", "get-session", Some("")), "https://a.example/auth/get-session");
}

// =============================================================================
// header filtering
// =============================================================================

#[test]
fn forward_headers_keeps_allow_list_only() {
    let mut incoming = HeaderMap::new();
    incoming.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    incoming.insert(COOKIE, HeaderValue::from_static("better-auth.session_token=abc"));
    incoming.insert(ORIGIN, HeaderValue::from_static("http://localhost:3000"));
    incoming.insert("authorization", HeaderValue::from_static("Bearer secret"));
    incoming.insert("host", HeaderValue::from_static("localhost:3000"));

    let out = forward_headers(&incoming);
    assert_eq!(out.len(), 3);
    assert!(out.get("authorization").is_none());
    assert!(out.get("host").is_none());
    assert_eq!(out.get(COOKIE).unwrap(), "better-auth.session_token=abc");
}

#[test]
fn relay_headers_keeps_every_set_cookie() {
    let mut upstream = HeaderMap::new();
    upstream.append(SET_COOKIE, HeaderValue::from_static("a=1; Path=/"));
    upstream.append(SET_COOKIE, HeaderValue::from_static("b=2; Path=/"));
    upstream.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    upstream.insert("x-internal", HeaderValue::from_static("1"));

    let out = relay_headers(&upstream);
    assert_eq!(out.get_all(SET_COOKIE).iter().count(), 2);
    assert!(out.get("x-internal").is_none());
}

#[test]
fn first_party_cookie_drops_domain() {
    let value = HeaderValue::from_static("token=abc; Domain=.neonauth.tech; Path=/; HttpOnly; SameSite=Lax");
    assert_eq!(first_party_cookie(&value), "token=abc; Path=/; HttpOnly; SameSite=Lax");

    let value = HeaderValue::from_static("token=abc; Path=/");
    assert_eq!(first_party_cookie(&value), "token=abc; Path=/");
}

#[tokio::test]
async fn proxy_error_is_bad_gateway() {
    let err = reqwest::Client::new().get("http://127.0.0.1:1/").send().await.unwrap_err();
    let response = ProxyError::from(err).into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// =============================================================================
// end to end through the router
// =============================================================================

async fn spawn_upstream() -> String {
    async fn get_session(headers: HeaderMap) -> Response {
        let signed_in = headers.get(COOKIE).is_some_and(|c| c.as_bytes().starts_with(b"token="));
        if signed_in {
            Json(serde_json::json!({ "user": { "id": "u1", "isAnonymous": true } })).into_response()
        } else {
            Json(serde_json::Value::Null).into_response()
        }
    }

    async fn sign_in_anonymous() -> Response {
        let mut response = Json(serde_json::json!({ "token": "t", "user": { "id": "u1", "isAnonymous": true } }))
            .into_response();
        response.headers_mut().append(SET_COOKIE, HeaderValue::from_static("token=t; Domain=upstream.test; Path=/"));
        response.headers_mut().append(SET_COOKIE, HeaderValue::from_static("token_data=x; Path=/"));
        response
    }

    async fn sign_in_email() -> Response {
        (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "code": "INVALID", "message": "Invalid email or password" })))
            .into_response()
    }

    let upstream = Router::new()
        .route("/auth/get-session", get(get_session))
        .route("/auth/sign-in/anonymous", post(sign_in_anonymous))
        .route("/auth/sign-in/email", post(sign_in_email));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    format!("http://{addr}/auth")
}

fn proxy_router(auth_base_url: String) -> Router {
    let config = ServerConfig { port: 0, auth_base_url, proxy_timeout: Duration::from_secs(5) };
    crate::routes::api_routes(AppState::new(&config).unwrap())
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn sign_in_relays_cookies_without_domain() {
    let app = proxy_router(spawn_upstream().await);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/sign-in/anonymous")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().map(|v| v.to_str().unwrap().to_owned()).collect();
    assert_eq!(cookies, vec!["token=t; Path=/".to_owned(), "token_data=x; Path=/".to_owned()]);
    assert_eq!(body_json(response).await["user"]["id"], "u1");
}

#[tokio::test]
async fn cookie_is_forwarded_upstream() {
    let app = proxy_router(spawn_upstream().await);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/get-session")
                .header(COOKIE, "token=t")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["isAnonymous"], true);
}

#[tokio::test]
async fn upstream_error_status_is_relayed() {
    let app = proxy_router(spawn_upstream().await);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/sign-in/email")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"a@b.co","password":"wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid email or password");
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let app = proxy_router("http://127.0.0.1:1/auth".to_owned());
    let response = app
        .oneshot(Request::builder().uri("/api/auth/get-session").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let message = body_json(response).await["message"].as_str().unwrap_or_default().to_owned();
    assert!(message.starts_with("auth service unreachable"));
}
