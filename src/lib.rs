//! # view-boundary
//!
//! Leptos + WASM page-view marker. `<ViewBoundary/>` is a zero-output node
//! mounted once near the app root; on every render it asks the navigation
//! tracker to attach, and the tracker emits one page view per distinct
//! navigation state.
//!
//! `boundary` holds the framework-independent lifecycle core, `components`
//! the Leptos binding, and `tracking` the tracker collaborator with its
//! configuration and sinks.

pub mod app;
pub mod boundary;
pub mod components;
pub mod tracking;

/// WASM entry point: hydrate the server-rendered app.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger not installed: {e}");
    }
    log::debug!("hydrating view-boundary app");
    leptos::mount::hydrate_body(app::App);
}
