//! The authentication-client seam.
//!
//! ARCHITECTURE
//! ============
//! Views and the CLI talk to [`AuthClient`]. The hosted service is reached
//! through [`HttpAuthClient`], which owns request bodies and response decoding
//! and delegates the actual HTTP round trip to a [`Transport`]. The browser
//! build plugs in a `gloo-net` transport, the CLI a `reqwest` one, and tests
//! a scripted fake.
//!
//! Futures are `?Send`: the browser transport holds JS handles across await
//! points.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{AuthFailure, ErrorBody};
use crate::types::{
    Credentials, ResetPasswordRequest, Session, SessionRecord, SignInResponse, SignUpRequest, SocialProvider,
    SocialRedirect,
};

/// Operations the demo consumes from the hosted auth service.
#[async_trait(?Send)]
pub trait AuthClient {
    /// Create a new anonymous session, replacing any current one.
    async fn sign_in_anonymous(&self) -> Result<Session, AuthFailure>;

    /// Sign in with email + password. While an anonymous session is active the
    /// service links it to the credentialed account.
    async fn sign_in_email(&self, credentials: &Credentials) -> Result<Session, AuthFailure>;

    async fn sign_up_email(&self, request: &SignUpRequest) -> Result<Session, AuthFailure>;

    /// Ask for the provider authorization URL to send the browser to.
    async fn sign_in_social(&self, provider: SocialProvider, callback_url: &str)
    -> Result<SocialRedirect, AuthFailure>;

    async fn forget_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthFailure>;

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AuthFailure>;

    async fn sign_out(&self) -> Result<(), AuthFailure>;

    /// Current session, `None` when signed out.
    async fn get_session(&self) -> Result<Option<Session>, AuthFailure>;

    /// Active sessions of the current user.
    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, AuthFailure>;
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// HTTP method used by an [`Endpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Service endpoints, relative to the auth base path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    SignInAnonymous,
    SignInEmail,
    SignUpEmail,
    SignInSocial,
    ForgetPassword,
    ResetPassword,
    SignOut,
    GetSession,
    ListSessions,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::SignInAnonymous => "/sign-in/anonymous",
            Self::SignInEmail => "/sign-in/email",
            Self::SignUpEmail => "/sign-up/email",
            Self::SignInSocial => "/sign-in/social",
            Self::ForgetPassword => "/forget-password",
            Self::ResetPassword => "/reset-password",
            Self::SignOut => "/sign-out",
            Self::GetSession => "/get-session",
            Self::ListSessions => "/list-sessions",
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::GetSession | Self::ListSessions => Method::Get,
            _ => Method::Post,
        }
    }

    /// Join this endpoint onto `base` without doubling slashes.
    #[must_use]
    pub fn url(self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP round trip to the auth service.
///
/// Implementations return `Err(AuthFailure::Unexpected)` only when no response
/// was received; every status code is reported through [`RawResponse`].
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<RawResponse, AuthFailure>;
}

/// Decode a response body, mapping non-2xx statuses to `OperationFailed`.
///
/// # Errors
///
/// `OperationFailed` for error statuses, `Unexpected` for undecodable bodies.
pub fn decode<T: DeserializeOwned>(raw: &RawResponse) -> Result<T, AuthFailure> {
    if !raw.is_success() {
        return Err(decode_error(raw));
    }
    let body = if raw.body.trim().is_empty() { "null" } else { raw.body.as_str() };
    serde_json::from_str(body).map_err(|e| AuthFailure::Unexpected(format!("invalid auth response: {e}")))
}

/// Error bodies that are not JSON still count as a refusal, just without a
/// message.
fn decode_error(raw: &RawResponse) -> AuthFailure {
    let body = serde_json::from_str::<ErrorBody>(&raw.body).unwrap_or_default();
    AuthFailure::rejected(raw.status, body)
}

/// [`AuthClient`] over any [`Transport`].
#[derive(Clone, Debug)]
pub struct HttpAuthClient<T> {
    transport: T,
}

impl<T: Transport> HttpAuthClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<R: DeserializeOwned>(&self, endpoint: Endpoint, body: Option<Value>) -> Result<R, AuthFailure> {
        let raw = self.transport.send(endpoint, body).await?;
        let result = decode(&raw);
        match &result {
            Ok(_) => tracing::debug!(endpoint = endpoint.path(), status = raw.status, "auth call succeeded"),
            Err(e) => tracing::debug!(endpoint = endpoint.path(), status = raw.status, error = %e, "auth call failed"),
        }
        result
    }
}

#[async_trait(?Send)]
impl<T: Transport> AuthClient for HttpAuthClient<T> {
    async fn sign_in_anonymous(&self) -> Result<Session, AuthFailure> {
        let resp: SignInResponse = self.call(Endpoint::SignInAnonymous, Some(json!({}))).await?;
        Ok(resp.into())
    }

    async fn sign_in_email(&self, credentials: &Credentials) -> Result<Session, AuthFailure> {
        let body = json!({ "email": credentials.email, "password": credentials.password });
        let resp: SignInResponse = self.call(Endpoint::SignInEmail, Some(body)).await?;
        Ok(resp.into())
    }

    async fn sign_up_email(&self, request: &SignUpRequest) -> Result<Session, AuthFailure> {
        let body = serde_json::to_value(request).map_err(|e| AuthFailure::Unexpected(e.to_string()))?;
        let resp: SignInResponse = self.call(Endpoint::SignUpEmail, Some(body)).await?;
        Ok(resp.into())
    }

    async fn sign_in_social(
        &self,
        provider: SocialProvider,
        callback_url: &str,
    ) -> Result<SocialRedirect, AuthFailure> {
        let body = json!({ "provider": provider.as_str(), "callbackURL": callback_url });
        self.call(Endpoint::SignInSocial, Some(body)).await
    }

    async fn forget_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthFailure> {
        let body = json!({ "email": email, "redirectTo": redirect_to });
        let _: Value = self.call(Endpoint::ForgetPassword, Some(body)).await?;
        Ok(())
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AuthFailure> {
        let body = serde_json::to_value(request).map_err(|e| AuthFailure::Unexpected(e.to_string()))?;
        let _: Value = self.call(Endpoint::ResetPassword, Some(body)).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        let _: Value = self.call(Endpoint::SignOut, Some(json!({}))).await?;
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthFailure> {
        self.call(Endpoint::GetSession, None).await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, AuthFailure> {
        self.call(Endpoint::ListSessions, None).await
    }
}
