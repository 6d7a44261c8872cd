//! Page-view sinks.
//!
//! DESIGN
//! ======
//! A sink receives each page view the tracker decides to emit. Delivery is
//! fire-and-forget: sinks never retry and never batch. Only failures that can
//! be detected synchronously (encoding, a sink refusing the view) are
//! returned; network failures in the browser are logged.

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use uuid::Uuid;

use super::config::TrackingConfig;
use super::error::TrackingError;

/// One tracking signal: a page view within a tracking session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub id: Uuid,
    pub session_id: Uuid,
    /// 1-based position within the session.
    pub seq: u64,
    /// Navigation state key, e.g. `/docs?page=2`.
    pub state: String,
    pub path: String,
    /// Previous navigation state of the same session.
    pub referrer: Option<String>,
    /// Epoch milliseconds; `0` off the browser.
    pub ts: i64,
}

pub trait SignalSink {
    fn send(&mut self, view: &PageView) -> Result<(), TrackingError>;
}

impl<T: SignalSink + ?Sized> SignalSink for Box<T> {
    fn send(&mut self, view: &PageView) -> Result<(), TrackingError> {
        (**self).send(view)
    }
}

/// Logs each page view to the console.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl SignalSink for ConsoleSink {
    fn send(&mut self, view: &PageView) -> Result<(), TrackingError> {
        leptos::logging::log!(
            "[view-boundary] pageview #{} {} (referrer: {})",
            view.seq,
            view.state,
            view.referrer.as_deref().unwrap_or("-")
        );
        Ok(())
    }
}

/// POSTs each page view as JSON to `endpoint`.
#[derive(Clone, Debug)]
pub struct BeaconSink {
    endpoint: String,
}

impl BeaconSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SignalSink for BeaconSink {
    fn send(&mut self, view: &PageView) -> Result<(), TrackingError> {
        let body = serde_json::to_string(view).map_err(|e| TrackingError::Encode(e.to_string()))?;
        #[cfg(feature = "hydrate")]
        {
            let endpoint = self.endpoint.clone();
            leptos::task::spawn_local(async move {
                let request = match gloo_net::http::Request::post(&endpoint)
                    .header("Content-Type", "application/json")
                    .body(body)
                {
                    Ok(request) => request,
                    Err(e) => {
                        leptos::logging::warn!("pageview request build failed: {e}");
                        return;
                    }
                };
                match request.send().await {
                    Ok(resp) if !resp.ok() => {
                        leptos::logging::warn!("pageview rejected: {} {}", endpoint, resp.status());
                    }
                    Ok(_) => {}
                    Err(e) => leptos::logging::warn!("pageview send failed: {e}"),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = body;
        }
        Ok(())
    }
}

/// Records page views in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    signals: Rc<RefCell<Vec<PageView>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<PageView> {
        self.signals.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.signals.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.signals.borrow_mut().clear();
    }
}

impl SignalSink for MemorySink {
    fn send(&mut self, view: &PageView) -> Result<(), TrackingError> {
        self.signals.borrow_mut().push(view.clone());
        Ok(())
    }
}

/// Forwards each page view to every inner sink.
///
/// All sinks see the view even if an earlier one fails; the first error is
/// returned afterwards.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn SignalSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: impl SignalSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SignalSink for FanoutSink {
    fn send(&mut self, view: &PageView) -> Result<(), TrackingError> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.send(view) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Sink implied by `config`: a beacon when an endpoint is set, plus console
/// logging in debug mode.
pub fn default_sink(config: &TrackingConfig) -> FanoutSink {
    let mut sink = FanoutSink::new();
    if let Some(endpoint) = &config.endpoint {
        sink = sink.with(BeaconSink::new(endpoint.clone()));
    }
    if config.debug {
        sink = sink.with(ConsoleSink);
    }
    sink
}
