//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Session state is an `RwSignal<SessionSnapshot>` from `authflow`, so the
//! browser applies exactly the transitions the observer model defines. `shell`
//! carries App Shell callbacks, `ui` local chrome.

pub mod session;
pub mod shell;
pub mod ui;
