//! Navigation tracker: the collaborator behind the view boundary.
//!
//! ARCHITECTURE
//! ============
//! `NavigationTracker` is a cheap clonable handle to one tracker core. Each
//! render-tree node that wants tracking takes an `Attachment` from it. The
//! core keeps a single tracking session alive while at least one attachment
//! is registered:
//!
//!   first attach  -> session created (id, sampling decision)
//!   every attach  -> read location, derive NavigationState, compare, emit
//!   last detach   -> session dropped; later attaches start a new one
//!
//! INVARIANTS
//! ==========
//! - At most one page view per distinct consecutive NavigationState within a
//!   session.
//! - A detached attachment can never emit: it no longer reaches the core.
//! - The last-seen state is recorded before the sink runs, so a failing sink
//!   is not retried by the next render.
//! - `before_send` and the sink run with the core released, so they may read
//!   any tracker handle.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use super::config::TrackingConfig;
use super::error::TrackingError;
use super::location::LocationSource;
use super::sink::{PageView, SignalSink, default_sink};
use super::state::{NavigationState, PageLocation};
use crate::boundary::NavigationTracking;

/// Hook run on every page view before it reaches the sink. Returning `None`
/// drops the view.
pub type BeforeSend = Box<dyn Fn(PageView) -> Option<PageView>>;

/// What a single attach did.
#[derive(Clone, Debug, PartialEq)]
pub enum AttachOutcome {
    /// A new navigation state was seen and its page view was sent.
    Tracked(PageView),
    /// Same navigation state as the previous attach.
    Unchanged,
    /// New state, but this session is sampled out.
    Unsampled,
    /// New state, dropped by the `before_send` hook.
    Filtered,
}

struct Session {
    id: Uuid,
    sampled: bool,
    holders: usize,
    last_state: Option<NavigationState>,
    seq: u64,
}

struct TrackerCore {
    config: TrackingConfig,
    session: Option<Session>,
}

/// What `observe` decided while holding the core borrow. Emitting is left to
/// the caller so the hook and sink run with the core released.
enum Decision {
    Done(AttachOutcome),
    Emit(PageView),
}

impl TrackerCore {
    fn register(&mut self) {
        let debug = self.config.debug;
        let sample_rate = self.config.sample_rate;
        let session = self.session.get_or_insert_with(|| {
            let id = Uuid::new_v4();
            let sampled = is_sampled(id, sample_rate);
            if debug {
                leptos::logging::log!("[view-boundary] session {id} started (sampled: {sampled})");
            }
            Session {
                id,
                sampled,
                holders: 0,
                last_state: None,
                seq: 0,
            }
        });
        session.holders += 1;
    }

    fn unregister(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.holders = session.holders.saturating_sub(1);
        if session.holders == 0 {
            if self.config.debug {
                leptos::logging::log!("[view-boundary] session {} stopped after {} pageviews", session.id, session.seq);
            }
            self.session = None;
        }
    }

    fn observe(&mut self, location: &PageLocation) -> Decision {
        let state = NavigationState::derive(location, self.config.state_key);
        let Some(session) = self.session.as_mut() else {
            return Decision::Done(AttachOutcome::Unchanged);
        };

        if session.last_state.as_ref() == Some(&state) {
            if self.config.debug {
                leptos::logging::log!("[view-boundary] {state} unchanged, skipping");
            }
            return Decision::Done(AttachOutcome::Unchanged);
        }

        let referrer = session.last_state.replace(state.clone());
        if !session.sampled {
            return Decision::Done(AttachOutcome::Unsampled);
        }

        Decision::Emit(PageView {
            id: Uuid::new_v4(),
            session_id: session.id,
            seq: session.seq + 1,
            state: state.to_string(),
            path: location.path.clone(),
            referrer: referrer.map(|r| r.to_string()),
            ts: now_millis(),
        })
    }

    /// Consume sequence number `seq` if `session_id` is still the live session.
    fn commit(&mut self, session_id: Uuid, seq: u64) {
        if let Some(session) = self.session.as_mut().filter(|s| s.id == session_id) {
            session.seq = session.seq.max(seq);
        }
    }
}

/// Shared handle to a navigation tracker.
#[derive(Clone)]
pub struct NavigationTracker {
    core: Rc<RefCell<TrackerCore>>,
    sink: Rc<RefCell<Box<dyn SignalSink>>>,
    before_send: Option<Rc<BeforeSend>>,
}

impl NavigationTracker {
    pub fn builder(config: TrackingConfig) -> NavigationTrackerBuilder {
        NavigationTrackerBuilder {
            config,
            sink: None,
            before_send: None,
        }
    }

    pub fn new(config: TrackingConfig, sink: impl SignalSink + 'static) -> Result<Self, TrackingError> {
        Self::builder(config).sink(sink).build()
    }

    /// Create an unattached handle reading its location from `location`.
    pub fn attachment(&self, location: impl LocationSource + 'static) -> Attachment {
        Attachment {
            tracker: self.clone(),
            location: Box::new(location),
            attached: false,
        }
    }

    pub fn config(&self) -> TrackingConfig {
        self.core.borrow().config.clone()
    }

    /// Whether a tracking session is currently alive.
    pub fn is_active(&self) -> bool {
        self.core.borrow().session.is_some()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.core.borrow().session.as_ref().map(|s| s.id)
    }

    pub fn attachment_count(&self) -> usize {
        self.core.borrow().session.as_ref().map_or(0, |s| s.holders)
    }
}

impl fmt::Debug for NavigationTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("NavigationTracker")
            .field("config", &core.config)
            .field("session_id", &core.session.as_ref().map(|s| s.id))
            .finish_non_exhaustive()
    }
}

pub struct NavigationTrackerBuilder {
    config: TrackingConfig,
    sink: Option<Box<dyn SignalSink>>,
    before_send: Option<BeforeSend>,
}

impl NavigationTrackerBuilder {
    /// Use `sink` instead of the one derived from the config.
    #[must_use]
    pub fn sink(mut self, sink: impl SignalSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn before_send(mut self, hook: impl Fn(PageView) -> Option<PageView> + 'static) -> Self {
        self.before_send = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<NavigationTracker, TrackingError> {
        self.config.validate()?;
        let sink = match self.sink {
            Some(sink) => sink,
            None => Box::new(default_sink(&self.config)),
        };
        Ok(NavigationTracker {
            core: Rc::new(RefCell::new(TrackerCore {
                config: self.config,
                session: None,
            })),
            sink: Rc::new(RefCell::new(sink)),
            before_send: self.before_send.map(Rc::new),
        })
    }
}

/// One node's connection to the tracker.
///
/// Registers with the tracker on the first [`Attachment::sync`] and
/// unregisters on [`Attachment::detach`] or drop.
pub struct Attachment {
    tracker: NavigationTracker,
    location: Box<dyn LocationSource>,
    attached: bool,
}

impl Attachment {
    /// Attach (if not yet attached) and compare the current location against
    /// the last one seen in this session.
    pub fn sync(&mut self) -> Result<AttachOutcome, TrackingError> {
        let location = self.location.current();
        let decision = {
            let mut core = self.tracker.core.borrow_mut();
            if !self.attached {
                core.register();
                self.attached = true;
            }
            core.observe(&location)
        };
        let view = match decision {
            Decision::Done(outcome) => return Ok(outcome),
            Decision::Emit(view) => view,
        };

        // The core is released from here on: the hook and the sink may call
        // back into any tracker handle.
        let (session_id, seq) = (view.session_id, view.seq);
        let view = match &self.tracker.before_send {
            Some(hook) => match hook(view) {
                Some(view) => view,
                None => {
                    if self.tracker.core.borrow().config.debug {
                        leptos::logging::log!("[view-boundary] pageview #{seq} dropped by before_send");
                    }
                    return Ok(AttachOutcome::Filtered);
                }
            },
            None => view,
        };
        self.tracker.core.borrow_mut().commit(session_id, seq);

        let mut sink = self
            .tracker
            .sink
            .try_borrow_mut()
            .map_err(|_| TrackingError::Delivery("sink is already sending".to_owned()))?;
        sink.send(&view)?;
        Ok(AttachOutcome::Tracked(view))
    }

    pub fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            self.tracker.core.borrow_mut().unregister();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn tracker(&self) -> &NavigationTracker {
        &self.tracker
    }
}

impl NavigationTracking for Attachment {
    type Error = TrackingError;

    fn attach(&mut self) -> Result<(), TrackingError> {
        self.sync().map(|_| ())
    }

    fn detach(&mut self) {
        Attachment::detach(self);
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Per-session sampling decision derived from the session id.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn is_sampled(session_id: Uuid, sample_rate: f64) -> bool {
    if sample_rate >= 1.0 {
        return true;
    }
    if sample_rate <= 0.0 {
        return false;
    }
    let high = (session_id.as_u128() >> 64) as u64;
    (high as f64 / u64::MAX as f64) < sample_rate
}

#[allow(clippy::cast_possible_truncation)]
fn now_millis() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}
