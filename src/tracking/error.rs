//! Errors raised by the navigation-tracking collaborator.
//!
//! The view boundary never produces errors of its own. Anything listed here
//! comes from configuration or signal delivery and travels through the
//! boundary untouched.

/// Errors produced by tracker configuration and signal delivery.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    /// `sampleRate` is not a finite number in `0.0..=1.0`.
    #[error("sample rate must be within 0.0..=1.0, got {0}")]
    InvalidSampleRate(f64),

    /// `endpoint` is empty or not an absolute path / http(s) URL.
    #[error("invalid tracking endpoint: {0:?}")]
    InvalidEndpoint(String),

    /// The JSON configuration could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A page view could not be serialized for delivery.
    #[error("pageview encode failed: {0}")]
    Encode(String),

    /// A sink refused the page view synchronously.
    #[error("signal delivery failed: {0}")]
    Delivery(String),
}
