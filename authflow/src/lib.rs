//! # authflow
//!
//! Framework-free model of the Neon Auth demo: session types, the
//! authentication-client seam, the Session Observer, and the view state
//! machines for the anonymous, home and credential pages.
//!
//! The `client` crate renders these models with Leptos; the `cli` crate
//! drives them from a terminal. Neither owns any auth logic of its own: every
//! state-changing operation is a single call through [`AuthClient`] to the
//! hosted service.

pub mod anonymous;
pub mod auth_view;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod home;
pub mod observer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use anonymous::{AnonymousPanel, Command, OperationResult};
pub use client::{AuthClient, HttpAuthClient, Transport};
pub use config::AuthUiConfig;
pub use error::{AuthFailure, FormError, Rejection};
pub use observer::{SessionObserver, SessionPhase, SessionSnapshot};
pub use types::{Session, User};
