//! Feva - marketing site with scroll-driven effects
//!
//! The effect logic lives in `core` as deterministic state machines that
//! emit DOM patches; `ui` renders the page with Leptos and, after hydration,
//! runs those machines against the live document.

#![recursion_limit = "4096"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
