//! Composition root: router, tracker context, and the single view boundary.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{A, Route, Router, Routes},
};

use crate::components::view_boundary::{ViewBoundary, provide_navigation_tracker};
use crate::tracking::{NavigationTracker, TrackingConfig, TrackingError};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Build the app tracker from the page config, falling back to defaults when
/// the config is unreadable.
fn app_tracker() -> Result<NavigationTracker, TrackingError> {
    let config = TrackingConfig::load().unwrap_or_else(|e| {
        leptos::logging::warn!("ignoring tracking config: {e}");
        TrackingConfig::default()
    });
    NavigationTracker::builder(config).build()
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let tracking = app_tracker().map(provide_navigation_tracker);
    if let Err(e) = &tracking {
        leptos::logging::warn!("navigation tracking disabled: {e}");
    }
    let tracking_enabled = tracking.is_ok();

    view! {
        <Title text="view-boundary"/>

        <Router>
            // Tracking failures must not take the page down with them.
            <ErrorBoundary fallback=|_errors| ()>
                {tracking_enabled.then(|| view! { <ViewBoundary/> })}
            </ErrorBoundary>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("docs") view=DocsPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <h1>"Home"</h1>
        <A href="/docs">"Docs"</A>
    }
}

#[component]
fn DocsPage() -> impl IntoView {
    view! {
        <h1>"Docs"</h1>
        <A href="/docs?section=install">"Install"</A>
        " "
        <A href="/">"Home"</A>
    }
}
