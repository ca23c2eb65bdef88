//! Energy Monitor Dashboard
//!
//! Real-time and historical energy monitoring built with Leptos (WASM).
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. View state, chart rendering, the auth state machine and the
//! token-refresh guard come from the `energy-monitor` library; this crate
//! wires them to signals, `localStorage` and `gloo-net`.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
