//! Reusable UI components.
//!
//! ARCHITECTURE
//! ============
//! Components read shared state from context and never call the auth client
//! themselves; pages own the command flow.

pub mod feature_card;
pub mod header;
pub mod logo;
pub mod user_avatar;
pub mod user_button;
