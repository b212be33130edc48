//! Session Observer glue for the browser.
//!
//! DESIGN
//! ======
//! The session lives in an `RwSignal<SessionSnapshot>` provided by the App
//! Shell. These helpers are its only writers: they fold client results and
//! local command outcomes in with the `authflow` snapshot transitions and call
//! the shell's session-change callback when the principal changes.

use authflow::observer::SessionChange;
use authflow::{AuthClient, SessionSnapshot};
use leptos::prelude::*;

use crate::state::shell::AuthShell;

/// Re-read the session from `client` and publish it.
pub async fn refresh<C: AuthClient + ?Sized>(session: RwSignal<SessionSnapshot>, shell: AuthShell, client: &C) {
    let result = client.get_session().await;
    if session.try_update(|snapshot| snapshot.resolve(result)).unwrap_or(false) {
        shell.session_changed();
    }
}

/// Publish a command's local update.
pub fn apply(session: RwSignal<SessionSnapshot>, shell: AuthShell, change: SessionChange) {
    if session.try_update(|snapshot| snapshot.apply(change)).unwrap_or(false) {
        shell.session_changed();
    }
}

/// Publish `change`, then confirm it with a refresh when asked to.
pub async fn settle<C: AuthClient + ?Sized>(
    session: RwSignal<SessionSnapshot>,
    shell: AuthShell,
    client: &C,
    change: SessionChange,
    refresh_after: bool,
) {
    apply(session, shell, change);
    if refresh_after {
        refresh(session, shell, client).await;
    }
}
