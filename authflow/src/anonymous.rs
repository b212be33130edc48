//! Anonymous Session View state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! The anonymous page lets a visitor start an anonymous session, retry it,
//! sign out, or link it to an email + password account. This module owns the
//! view-side bookkeeping for that page: which command is in flight, the last
//! error, the last response, and the link form fields. The session itself
//! lives in the Session Observer.
//!
//! Commands run in three steps so a reactive UI can drive them without
//! holding a borrow across an await:
//!
//! 1. [`AnonymousPanel::begin`] checks the busy guard, the state transition
//!    and the form, and returns a [`Pending`] call.
//! 2. [`Pending::execute`] awaits exactly one auth-client call.
//! 3. [`AnonymousPanel::complete`] records the result and returns what the
//!    observer should do next.
//!
//! [`AnonymousPanel::dispatch`] chains the three for callers that can hold
//! `&mut` across the await (CLI, tests).

#[cfg(test)]
#[path = "anonymous_test.rs"]
mod anonymous_test;

use serde::Serialize;
use serde_json::Value;

use crate::client::AuthClient;
use crate::error::{AuthFailure, ErrorBody, Rejection};
use crate::forms::LinkRequest;
use crate::observer::{SessionChange, SessionObserver, SessionPhase};
use crate::types::{Credentials, Session};

/// Fallback label when an anonymous session has neither name nor email.
pub const ANONYMOUS_USER_LABEL: &str = "Anonymous User";

/// Commands the anonymous page can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SignInAnonymous,
    SignOut,
    LinkAccount,
}

impl Command {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SignInAnonymous => "anonymous sign-in",
            Self::SignOut => "sign out",
            Self::LinkAccount => "link account",
        }
    }

    /// Message shown when the service refuses without saying why.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::SignInAnonymous => "Anonymous sign-in failed",
            Self::SignOut => "Sign out failed",
            Self::LinkAccount => "Link account failed",
        }
    }

    /// Whether `phase` has a transition for this command.
    #[must_use]
    pub fn permitted_in(self, phase: SessionPhase) -> bool {
        match self {
            Self::SignInAnonymous => phase != SessionPhase::AuthenticatedPermanent,
            Self::SignOut => phase != SessionPhase::Unauthenticated,
            Self::LinkAccount => phase == SessionPhase::AuthenticatedAnonymous,
        }
    }
}

/// Last outcome shown in the "Last Response" panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    Success { data: Value },
    Failure { error: ErrorBody },
}

impl OperationResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Indented JSON for display.
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// A validated command, ready to hit the auth client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pending {
    SignInAnonymous,
    SignOut,
    LinkAccount(Credentials),
}

impl Pending {
    #[must_use]
    pub fn command(&self) -> Command {
        match self {
            Self::SignInAnonymous => Command::SignInAnonymous,
            Self::SignOut => Command::SignOut,
            Self::LinkAccount(_) => Command::LinkAccount,
        }
    }

    /// Await exactly one auth-client call.
    pub async fn execute<C: AuthClient + ?Sized>(self, client: &C) -> Completion {
        let command = self.command();
        let outcome = match self {
            Self::SignInAnonymous => client.sign_in_anonymous().await.map(Some),
            Self::SignOut => client.sign_out().await.map(|()| None),
            Self::LinkAccount(credentials) => client.sign_in_email(&credentials).await.map(Some),
        };
        Completion { command, outcome }
    }
}

/// Result of a [`Pending`] call. Sign-ins yield `Some(session)`, sign-out
/// yields `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub command: Command,
    pub outcome: Result<Option<Session>, AuthFailure>,
}

/// What the Session Observer should do after a command settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settled {
    /// Re-read the session from the client.
    pub refresh: bool,
    /// Local update to publish before the refresh lands.
    pub change: SessionChange,
}

/// "Signed in as" card contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCard {
    pub signed_in_as: String,
    pub user_id: String,
    pub anonymous: bool,
}

impl SessionCard {
    #[must_use]
    pub fn of(session: &Session) -> Self {
        Self {
            signed_in_as: session.user.display_name(ANONYMOUS_USER_LABEL).to_owned(),
            user_id: session.user.id.clone(),
            anonymous: session.is_anonymous(),
        }
    }

    /// Badge text, shown only for anonymous sessions.
    #[must_use]
    pub fn badge(&self) -> Option<&'static str> {
        self.anonymous.then_some("Anonymous")
    }
}

/// View-side state of the anonymous page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnonymousPanel {
    in_flight: Option<Command>,
    /// Message for the error box.
    pub error: Option<String>,
    pub last_result: Option<OperationResult>,
    pub link: LinkRequest,
}

impl AnonymousPanel {
    #[must_use]
    pub fn in_flight(&self) -> Option<Command> {
        self.in_flight
    }

    /// Controls are disabled while any command is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The link form exists only for anonymous sessions.
    #[must_use]
    pub fn shows_link_form(phase: SessionPhase) -> bool {
        phase == SessionPhase::AuthenticatedAnonymous
    }

    /// The "try again" button exists only where a new anonymous session may
    /// replace the current one.
    #[must_use]
    pub fn shows_retry(phase: SessionPhase) -> bool {
        phase == SessionPhase::AuthenticatedAnonymous
    }

    #[must_use]
    pub fn can_submit_link(&self) -> bool {
        !self.is_busy() && self.link.is_filled()
    }

    /// Label of the main sign-in button for `phase`.
    #[must_use]
    pub fn sign_in_label(&self, phase: SessionPhase) -> &'static str {
        match (phase, self.in_flight) {
            (SessionPhase::Unauthenticated, Some(Command::SignInAnonymous)) => "Signing in...",
            (SessionPhase::Unauthenticated, _) => "👻 Sign In Anonymously",
            (_, Some(_)) => "Loading...",
            (_, None) => "Try Again (new anonymous session)",
        }
    }

    #[must_use]
    pub fn link_label(&self) -> &'static str {
        if self.in_flight == Some(Command::LinkAccount) { "Linking..." } else { "Link Account" }
    }

    /// Start `command` from `phase`.
    ///
    /// # Errors
    ///
    /// `Busy` while another command runs, `NotPermitted` when `phase` has no
    /// such transition, `Invalid` when the link form fails validation. Both
    /// `NotPermitted` and `Invalid` also put their message in the error box.
    pub fn begin(&mut self, command: Command, phase: SessionPhase) -> Result<Pending, Rejection> {
        if let Some(running) = self.in_flight {
            tracing::debug!(?command, ?running, "command refused while busy");
            return Err(Rejection::Busy);
        }
        if !command.permitted_in(phase) {
            let rejection = Rejection::NotPermitted { command: command.label(), phase: phase.describe() };
            self.error = Some(rejection.to_string());
            return Err(rejection);
        }

        let pending = match command {
            Command::SignInAnonymous => Pending::SignInAnonymous,
            Command::SignOut => Pending::SignOut,
            Command::LinkAccount => match self.link.validate() {
                Ok(credentials) => Pending::LinkAccount(credentials),
                Err(e) => {
                    self.error = Some(e.to_string());
                    return Err(e.into());
                }
            },
        };

        // Sign-out keeps the previous result on screen until it succeeds.
        if command != Command::SignOut {
            self.error = None;
            self.last_result = None;
        }
        self.in_flight = Some(command);
        Ok(pending)
    }

    /// Record the outcome of a command started with [`AnonymousPanel::begin`].
    pub fn complete(&mut self, completion: Completion) -> Settled {
        let Completion { command, outcome } = completion;
        self.in_flight = None;

        match outcome {
            Ok(Some(session)) => {
                tracing::info!(?command, user_id = %session.user.id, anonymous = session.is_anonymous(), "auth command succeeded");
                let data = serde_json::to_value(&session).unwrap_or(Value::Null);
                self.last_result = Some(OperationResult::Success { data });
                self.error = None;
                if command == Command::LinkAccount {
                    self.link.clear();
                }
                Settled { refresh: true, change: SessionChange::Replace(session) }
            }
            Ok(None) => {
                tracing::info!(?command, "auth command succeeded");
                self.last_result = None;
                self.error = None;
                Settled { refresh: true, change: SessionChange::Clear }
            }
            Err(failure) => {
                let fallback = command.fallback_message();
                tracing::warn!(?command, error = %failure, "auth command failed");
                self.error = Some(failure.display_message(fallback));
                if command != Command::SignOut {
                    self.last_result = Some(OperationResult::Failure { error: failure.to_body(fallback) });
                }
                Settled { refresh: false, change: SessionChange::Keep }
            }
        }
    }

    /// Run `command` end to end: begin, call the client, complete, publish
    /// the local change, and refresh on success.
    ///
    /// # Errors
    ///
    /// The [`Rejection`] from [`AnonymousPanel::begin`]; client failures are
    /// recorded on the panel instead.
    pub async fn dispatch<C: AuthClient + ?Sized>(
        &mut self,
        command: Command,
        observer: &SessionObserver,
        client: &C,
    ) -> Result<Settled, Rejection> {
        let pending = self.begin(command, observer.snapshot().phase())?;
        let completion = pending.execute(client).await;
        let settled = self.complete(completion);
        observer.apply(settled.change.clone());
        if settled.refresh {
            observer.refresh(client).await;
        }
        Ok(settled)
    }
}
