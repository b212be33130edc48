//! # client
//!
//! Leptos + WASM frontend for the Neon Auth demo.
//!
//! This crate renders the `authflow` models: the App Shell, the home page, the
//! anonymous sign-in page, the credential auth pages and the account pages.
//! All auth calls go through [`net::api::BrowserClient`] to the same-origin
//! `/api/auth` proxy served by the `server` crate.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
