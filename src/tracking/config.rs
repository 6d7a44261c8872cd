//! Tracker configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The view boundary takes no props. Anything tunable (sampling, debug
//! logging, delivery endpoint, equality policy) is configured on the tracker
//! here. In the browser the JSON document is read from a `<meta>` tag so the
//! server can set it per deployment without rebuilding the WASM bundle.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use super::error::TrackingError;
use super::state::StateKey;

/// `name` of the `<meta>` element whose `content` holds the JSON config.
pub const CONFIG_META_NAME: &str = "view-boundary-config";

pub const DEFAULT_SAMPLE_RATE: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackingConfig {
    /// Fraction of sessions that emit page views, `0.0..=1.0`.
    pub sample_rate: f64,
    /// Log every attach decision and every emitted page view.
    pub debug: bool,
    /// Where `BeaconSink` posts page views. `None` disables delivery.
    pub endpoint: Option<String>,
    pub state_key: StateKey,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            debug: false,
            endpoint: None,
            state_key: StateKey::default(),
        }
    }
}

impl TrackingConfig {
    /// Parse and validate a JSON config document. Missing fields take their
    /// defaults.
    pub fn from_json(raw: &str) -> Result<Self, TrackingError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrackingError> {
        if !self.sample_rate.is_finite() || !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(TrackingError::InvalidSampleRate(self.sample_rate));
        }
        if let Some(endpoint) = &self.endpoint {
            if !is_valid_endpoint(endpoint) {
                return Err(TrackingError::InvalidEndpoint(endpoint.clone()));
            }
        }
        Ok(())
    }

    /// Load the config from the page's `<meta name="view-boundary-config">`.
    ///
    /// Returns the default config when the tag is absent or when not running
    /// in a browser.
    pub fn load() -> Result<Self, TrackingError> {
        #[cfg(feature = "hydrate")]
        {
            let selector = format!("meta[name=\"{CONFIG_META_NAME}\"]");
            let content = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|doc| doc.query_selector(&selector).ok().flatten())
                .and_then(|el| el.get_attribute("content"));
            match content {
                Some(raw) => Self::from_json(&raw),
                None => Ok(Self::default()),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(Self::default())
        }
    }
}

fn is_valid_endpoint(endpoint: &str) -> bool {
    let endpoint = endpoint.trim();
    !endpoint.is_empty()
        && (endpoint.starts_with('/') || endpoint.starts_with("http://") || endpoint.starts_with("https://"))
}
