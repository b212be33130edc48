//! Local UI chrome state (theme, user menu, page command in flight).

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use crate::util::theme::Theme;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub theme: Theme,
    pub user_menu_open: bool,
    /// A page command (anonymous sign-in, link, sign-out) is awaiting the
    /// auth client.
    pub page_busy: bool,
}

impl UiState {
    pub fn toggle_user_menu(&mut self) {
        self.user_menu_open = !self.user_menu_open;
    }

    pub fn close_user_menu(&mut self) {
        self.user_menu_open = false;
    }

    pub fn set_page_busy(&mut self, busy: bool) {
        self.page_busy = busy;
    }

    /// Header sign-out waits for the running page command.
    pub fn sign_out_enabled(&self) -> bool {
        !self.page_busy
    }
}
