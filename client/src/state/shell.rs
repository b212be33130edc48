//! App Shell handle shared through context.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views never navigate or invalidate route data directly. They ask the shell:
//! `navigate` / `replace` / `go` queue a navigation that `ShellNavigator` (inside the
//! router) carries out, and `session_changed` bumps the route epoch that
//! route-level resources key on.

use authflow::auth_view::Navigation;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct AuthShell {
    route_epoch: RwSignal<u64>,
    pending: RwSignal<Option<Navigation>>,
}

impl Default for AuthShell {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthShell {
    pub fn new() -> Self {
        Self { route_epoch: RwSignal::new(0), pending: RwSignal::new(None) }
    }

    /// Tracked read of the route epoch.
    pub fn route_epoch(&self) -> u64 {
        self.route_epoch.get()
    }

    /// Session-change callback: invalidate route-level data.
    pub fn session_changed(&self) {
        self.route_epoch.update(|epoch| *epoch += 1);
        log_session_change(self.route_epoch.get_untracked());
    }

    /// Push `path` onto the history stack.
    pub fn navigate(&self, path: &str) {
        self.go(Navigation::Push(path.to_owned()));
    }

    /// Replace the current route with `path`.
    pub fn replace(&self, path: &str) {
        self.go(Navigation::Replace(path.to_owned()));
    }

    pub fn go(&self, target: Navigation) {
        self.pending.set(Some(target));
    }

    /// Tracked take of the queued navigation.
    pub fn take_navigation(&self) -> Option<Navigation> {
        let next = self.pending.get();
        if next.is_some() {
            self.pending.set(None);
        }
        next
    }
}

fn log_session_change(epoch: u64) {
    #[cfg(feature = "hydrate")]
    log::debug!("session changed, route epoch {epoch}");
    #[cfg(not(feature = "hydrate"))]
    let _ = epoch;
}
