//! Networking: the browser transport behind the auth client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` plugs `gloo-net` into `authflow`'s `Transport` seam. Request bodies,
//! decoding and error mapping live in `authflow::client`.

pub mod api;
