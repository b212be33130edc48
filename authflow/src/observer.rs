//! Session Observer: the single source of session state for views.
//!
//! DESIGN
//! ======
//! The auth client is the only writer. [`SessionSnapshot`] holds the state
//! transitions; [`SessionObserver`] broadcasts snapshots over a `watch`
//! channel to any number of read-only subscribers. The browser client applies
//! the same snapshot transitions to a reactive signal instead of a channel.
//!
//! `version` moves only when the observed principal changes. Session-change
//! hooks (route cache invalidation) key off that, not off every refresh.

#[cfg(test)]
#[path = "observer_test.rs"]
mod observer_test;

use tokio::sync::watch;

use crate::client::AuthClient;
use crate::error::AuthFailure;
use crate::types::Session;

/// The three mutually exclusive session states a view can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    AuthenticatedAnonymous,
    AuthenticatedPermanent,
}

impl SessionPhase {
    #[must_use]
    pub fn of(session: Option<&Session>) -> Self {
        match session {
            None => Self::Unauthenticated,
            Some(s) if s.is_anonymous() => Self::AuthenticatedAnonymous,
            Some(_) => Self::AuthenticatedPermanent,
        }
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Unauthenticated => "signed out",
            Self::AuthenticatedAnonymous => "signed in anonymously",
            Self::AuthenticatedPermanent => "signed in",
        }
    }
}

/// Local update applied after a command, ahead of the confirming refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionChange {
    /// The command produced a new session.
    Replace(Session),
    /// The command ended the session.
    Clear,
    /// Nothing to apply.
    Keep,
}

/// What views read: the session, whether the first load is pending, and a
/// change counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    /// True until the first refresh resolves.
    pub loading: bool,
    /// Bumped whenever the principal changes.
    pub version: u64,
    /// Message of the most recent failed refresh, cleared by the next success.
    pub last_refresh_error: Option<String>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self { session: None, loading: true, version: 0, last_refresh_error: None }
    }
}

impl SessionSnapshot {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        SessionPhase::of(self.session.as_ref())
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.phase() == SessionPhase::AuthenticatedAnonymous
    }

    /// Replace the session. Returns `true` if the principal changed.
    pub fn set_session(&mut self, next: Option<Session>) -> bool {
        let changed = match (&self.session, &next) {
            (None, None) => false,
            (Some(a), Some(b)) => !a.same_principal(b),
            _ => true,
        };
        self.session = next;
        self.loading = false;
        self.last_refresh_error = None;
        if changed {
            self.version += 1;
        }
        changed
    }

    /// Fold a `get_session` result in. A failed refresh keeps the previous
    /// session.
    pub fn resolve(&mut self, result: Result<Option<Session>, AuthFailure>) -> bool {
        match result {
            Ok(next) => self.set_session(next),
            Err(e) => {
                self.loading = false;
                self.last_refresh_error = Some(e.display_message("Session refresh failed"));
                false
            }
        }
    }

    /// Apply a command's local update. Returns `true` if the principal changed.
    pub fn apply(&mut self, change: SessionChange) -> bool {
        match change {
            SessionChange::Replace(session) => self.set_session(Some(session)),
            SessionChange::Clear => self.set_session(None),
            SessionChange::Keep => false,
        }
    }
}

type ChangeHook = Box<dyn Fn(&SessionSnapshot)>;

/// Broadcasts [`SessionSnapshot`]s to subscribers.
pub struct SessionObserver {
    tx: watch::Sender<SessionSnapshot>,
    hooks: Vec<ChangeHook>,
}

impl Default for SessionObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self { tx, hooks: Vec::new() }
    }

    /// Read-only handle that sees every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Register a callback run after every principal change.
    pub fn on_change(&mut self, hook: impl Fn(&SessionSnapshot) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Re-read the session from `client` and publish it.
    pub async fn refresh<C: AuthClient + ?Sized>(&self, client: &C) -> SessionSnapshot {
        let result = client.get_session().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "session refresh failed");
        }
        self.publish(|snapshot| snapshot.resolve(result))
    }

    /// Publish a command's local update.
    pub fn apply(&self, change: SessionChange) -> SessionSnapshot {
        self.publish(|snapshot| snapshot.apply(change))
    }

    fn publish(&self, update: impl FnOnce(&mut SessionSnapshot) -> bool) -> SessionSnapshot {
        let mut changed = false;
        self.tx.send_modify(|snapshot| changed = update(snapshot));
        let snapshot = self.snapshot();
        if changed {
            tracing::debug!(version = snapshot.version, phase = ?snapshot.phase(), "session changed");
            for hook in &self.hooks {
                hook(&snapshot);
            }
        }
        snapshot
    }
}
