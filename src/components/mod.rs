//! Leptos components.

pub mod view_boundary;
