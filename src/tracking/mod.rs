//! Navigation tracking collaborator.
//!
//! DESIGN
//! ======
//! Everything the view boundary deliberately does not own lives here: the
//! navigation-state comparison, the session lifecycle, sampling, and signal
//! delivery. The boundary reaches it only through
//! [`crate::boundary::NavigationTracking`], implemented by [`Attachment`].

pub mod config;
pub mod error;
pub mod location;
pub mod sink;
pub mod state;
pub mod tracker;

pub use config::TrackingConfig;
pub use error::TrackingError;
pub use location::{BrowserLocation, LocationSource, MemoryLocation, RouterLocation};
pub use sink::{BeaconSink, ConsoleSink, FanoutSink, MemorySink, PageView, SignalSink, default_sink};
pub use state::{NavigationState, PageLocation, StateKey};
pub use tracker::{AttachOutcome, Attachment, NavigationTracker, NavigationTrackerBuilder};
