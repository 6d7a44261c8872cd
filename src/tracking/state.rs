//! Navigation identity as seen by the tracker.
//!
//! DESIGN
//! ======
//! `PageLocation` is the raw location read from the host. `NavigationState`
//! is the comparable key derived from it under a `StateKey` policy. Only the
//! tracker builds or compares navigation states; the view boundary never
//! sees them.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw location components, without their `?` / `#` prefixes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub path: String,
    pub query: String,
    pub hash: String,
}

impl PageLocation {
    /// Build a location from separately read parts. Accepts parts with or
    /// without their leading `?` / `#`, as browsers and routers differ.
    pub fn new(path: impl Into<String>, query: impl AsRef<str>, hash: impl AsRef<str>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "/".to_owned() } else { path },
            query: query.as_ref().trim_start_matches('?').to_owned(),
            hash: hash.as_ref().trim_start_matches('#').to_owned(),
        }
    }

    /// Split `"/path?query#hash"` into its parts.
    pub fn parse(url: &str) -> Self {
        let (rest, hash) = url.split_once('#').unwrap_or((url, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self::new(path, query, hash)
    }
}

/// Which location components make two page views distinct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKey {
    Path,
    #[default]
    PathQuery,
    PathQueryHash,
}

/// Opaque identifier of the current logical page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NavigationState(String);

impl NavigationState {
    /// Derive the comparable key for `location` under `key`.
    pub fn derive(location: &PageLocation, key: StateKey) -> Self {
        let mut out = if location.path.is_empty() {
            "/".to_owned()
        } else {
            location.path.clone()
        };
        if matches!(key, StateKey::PathQuery | StateKey::PathQueryHash) && !location.query.is_empty() {
            out.push('?');
            out.push_str(&location.query);
        }
        if key == StateKey::PathQueryHash && !location.hash.is_empty() {
            out.push('#');
            out.push_str(&location.hash);
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
