//! Where the tracker reads the current location from.
//!
//! SYSTEM CONTEXT
//! ==============
//! The attach capability takes no arguments, so each attachment carries its
//! own `LocationSource`. Inside a Leptos router the source is the router's
//! location memos; outside one it is `window.location`.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use super::state::PageLocation;

/// Read-only view of the host's current location.
pub trait LocationSource {
    fn current(&self) -> PageLocation;
}

/// `window.location`. Off the browser this always reports `/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocation;

impl LocationSource for BrowserLocation {
    fn current(&self) -> PageLocation {
        #[cfg(feature = "hydrate")]
        {
            let Some(location) = web_sys::window().map(|w| w.location()) else {
                return PageLocation::default();
            };
            PageLocation::new(
                location.pathname().unwrap_or_default(),
                location.search().unwrap_or_default(),
                location.hash().unwrap_or_default(),
            )
        }
        #[cfg(not(feature = "hydrate"))]
        {
            PageLocation::new("/", "", "")
        }
    }
}

/// The router's reactive location, read without subscribing.
///
/// The view boundary subscribes to these memos itself; the tracker only
/// samples them.
#[derive(Clone, Copy, Debug)]
pub struct RouterLocation {
    pathname: Memo<String>,
    search: Memo<String>,
    hash: Memo<String>,
}

impl RouterLocation {
    pub fn new(location: &leptos_router::location::Location) -> Self {
        Self {
            pathname: location.pathname,
            search: location.search,
            hash: location.hash,
        }
    }
}

impl LocationSource for RouterLocation {
    fn current(&self) -> PageLocation {
        PageLocation::new(
            self.pathname.get_untracked(),
            self.search.get_untracked(),
            self.hash.get_untracked(),
        )
    }
}

/// In-memory location for hosts without a browser, and for tests.
#[derive(Clone, Debug)]
pub struct MemoryLocation {
    current: Rc<RefCell<PageLocation>>,
}

impl MemoryLocation {
    pub fn new(url: &str) -> Self {
        Self {
            current: Rc::new(RefCell::new(PageLocation::parse(url))),
        }
    }

    /// Replace the current location. Visible to every clone.
    pub fn navigate(&self, url: &str) {
        *self.current.borrow_mut() = PageLocation::parse(url);
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl LocationSource for MemoryLocation {
    fn current(&self) -> PageLocation {
        self.current.borrow().clone()
    }
}

impl<T: LocationSource + ?Sized> LocationSource for Box<T> {
    fn current(&self) -> PageLocation {
        (**self).current()
    }
}
