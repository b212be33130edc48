//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration: it starts commands through the
//! `authflow` view models, awaits the auth client, and hands the outcome to
//! the session helpers and the shell. Rendering details live in `components`.

pub mod account;
pub mod anonymous;
pub mod auth;
pub mod home;
