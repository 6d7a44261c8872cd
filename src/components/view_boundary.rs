//! `<ViewBoundary/>`: the zero-output page-view marker for Leptos apps.
//!
//! SYSTEM CONTEXT
//! ==============
//! Place it once inside the `<Router>`, next to the routed content. It
//! renders nothing; its only job is to keep the navigation tracker attached
//! for as long as it is in the tree.
//!
//! LIFECYCLE
//! =========
//! - component creation: take an `Attachment` bound to the router location
//! - first run of the view closure: mount + initial attach (first page view)
//! - router pathname/search/hash change: re-render, attach again; the
//!   tracker decides whether it is a new page view
//! - `on_cleanup`: unmount, detach; dropping the stored boundary detaches too
//!
//! ERROR HANDLING
//! ==============
//! The view is a `Result<(), TrackingError>`. Tracker errors surface in the
//! nearest `<ErrorBoundary>` exactly as the tracker produced them.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::boundary;
use crate::tracking::{NavigationTracker, RouterLocation, TrackingError};

/// Context handle to the app's tracker. The tracker is `!Send`, so it lives
/// in local arena storage on the UI thread.
pub type TrackerHandle = StoredValue<NavigationTracker, LocalStorage>;

/// Make `tracker` available to every `<ViewBoundary/>` below this owner.
pub fn provide_navigation_tracker(tracker: NavigationTracker) -> TrackerHandle {
    let handle = StoredValue::new_local(tracker);
    provide_context(handle);
    handle
}

/// Zero-output marker that attaches navigation tracking on every render.
///
/// Requires a `TrackerHandle` in context, see [`provide_navigation_tracker`].
#[component]
pub fn ViewBoundary() -> impl IntoView {
    let tracker = expect_context::<TrackerHandle>();
    let location = use_location();
    let attachment = tracker.with_value(|t| t.attachment(RouterLocation::new(&location)));
    let node = StoredValue::new_local(boundary::ViewBoundary::new(attachment));

    on_cleanup(move || {
        let _ = node.try_update_value(boundary::ViewBoundary::unmount);
    });

    let (pathname, search, hash) = (location.pathname, location.search, location.hash);
    move || -> Result<(), TrackingError> {
        pathname.track();
        search.track();
        hash.track();
        node.try_update_value(|b| b.render().map(|boundary::Empty| ()))
            .unwrap_or(Ok(()))
    }
}
