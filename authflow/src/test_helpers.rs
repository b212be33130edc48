//! Scripted collaborators for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{AuthClient, Endpoint, RawResponse, Transport};
use crate::error::AuthFailure;
use crate::types::{
    Credentials, ResetPasswordRequest, Session, SessionRecord, SignUpRequest, SocialProvider, SocialRedirect, User,
};

/// Transport that replays canned responses and records requests.
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<RawResponse, AuthFailure>>>,
    calls: RefCell<Vec<(Endpoint, Option<Value>)>>,
}

impl FakeTransport {
    pub fn new(responses: Vec<Result<RawResponse, AuthFailure>>) -> Self {
        Self { responses: RefCell::new(responses.into()), calls: RefCell::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<(Endpoint, Option<Value>)> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<RawResponse, AuthFailure> {
        self.calls.borrow_mut().push((endpoint, body));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AuthFailure::Unexpected("no scripted response".to_owned())))
    }
}

/// A call observed by [`ScriptedClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    SignInAnonymous,
    SignInEmail(Credentials),
    SignUpEmail(SignUpRequest),
    SignInSocial(SocialProvider),
    ForgetPassword(String),
    ResetPassword(ResetPasswordRequest),
    SignOut,
    GetSession,
    ListSessions,
}

/// Auth client whose session-producing calls pop from a script.
///
/// `get_session` answers from `current`, which successful sign-ins update,
/// unless a refresh failure is queued.
#[derive(Default)]
pub struct ScriptedClient {
    pub sessions: RefCell<VecDeque<Result<Session, AuthFailure>>>,
    pub units: RefCell<VecDeque<Result<(), AuthFailure>>>,
    pub refresh_failures: RefCell<VecDeque<AuthFailure>>,
    pub current: RefCell<Option<Session>>,
    pub calls: RefCell<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(session: Option<Session>) -> Self {
        let client = Self::new();
        *client.current.borrow_mut() = session;
        client
    }

    pub fn push_session(&self, result: Result<Session, AuthFailure>) {
        self.sessions.borrow_mut().push_back(result);
    }

    pub fn push_unit(&self, result: Result<(), AuthFailure>) {
        self.units.borrow_mut().push_back(result);
    }

    pub fn fail_next_refresh(&self, failure: AuthFailure) {
        self.refresh_failures.borrow_mut().push_back(failure);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next_session(&self) -> Result<Session, AuthFailure> {
        let result = self
            .sessions
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AuthFailure::Unexpected("no scripted session".to_owned())));
        if let Ok(session) = &result {
            *self.current.borrow_mut() = Some(session.clone());
        }
        result
    }

    fn next_unit(&self) -> Result<(), AuthFailure> {
        self.units.borrow_mut().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait(?Send)]
impl AuthClient for ScriptedClient {
    async fn sign_in_anonymous(&self) -> Result<Session, AuthFailure> {
        self.calls.borrow_mut().push(Call::SignInAnonymous);
        self.next_session()
    }

    async fn sign_in_email(&self, credentials: &Credentials) -> Result<Session, AuthFailure> {
        self.calls.borrow_mut().push(Call::SignInEmail(credentials.clone()));
        self.next_session()
    }

    async fn sign_up_email(&self, request: &SignUpRequest) -> Result<Session, AuthFailure> {
        self.calls.borrow_mut().push(Call::SignUpEmail(request.clone()));
        self.next_session()
    }

    async fn sign_in_social(
        &self,
        provider: SocialProvider,
        callback_url: &str,
    ) -> Result<SocialRedirect, AuthFailure> {
        self.calls.borrow_mut().push(Call::SignInSocial(provider));
        Ok(SocialRedirect { url: format!("https://{}.example/authorize?cb={callback_url}", provider.as_str()), redirect: true })
    }

    async fn forget_password(&self, email: &str, _redirect_to: &str) -> Result<(), AuthFailure> {
        self.calls.borrow_mut().push(Call::ForgetPassword(email.to_owned()));
        self.next_unit()
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), AuthFailure> {
        self.calls.borrow_mut().push(Call::ResetPassword(request.clone()));
        self.next_unit()
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.calls.borrow_mut().push(Call::SignOut);
        let result = self.next_unit();
        if result.is_ok() {
            *self.current.borrow_mut() = None;
        }
        result
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthFailure> {
        self.calls.borrow_mut().push(Call::GetSession);
        if let Some(failure) = self.refresh_failures.borrow_mut().pop_front() {
            return Err(failure);
        }
        Ok(self.current.borrow().clone())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, AuthFailure> {
        self.calls.borrow_mut().push(Call::ListSessions);
        Ok(Vec::new())
    }
}

/// Anonymous session for user `id`.
pub fn anonymous_session(id: &str) -> Session {
    Session {
        record: None,
        user: User {
            id: id.to_owned(),
            name: Some("Anonymous".to_owned()),
            email: None,
            email_verified: false,
            image: None,
            is_anonymous: Some(true),
            created_at: None,
            updated_at: None,
        },
    }
}

/// Permanent session for user `id` with `email`.
pub fn permanent_session(id: &str, email: &str) -> Session {
    Session {
        record: None,
        user: User {
            id: id.to_owned(),
            name: None,
            email: Some(email.to_owned()),
            email_verified: false,
            image: None,
            is_anonymous: Some(false),
            created_at: None,
            updated_at: None,
        },
    }
}
