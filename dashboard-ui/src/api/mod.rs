//! API Client
//!
//! `gloo-net` calls against the energy API. Paths come from the shared
//! endpoint catalogue and every authenticated call runs the shared
//! token-refresh guard over the localStorage session.

pub mod auth;
pub mod client;

pub use client::*;
