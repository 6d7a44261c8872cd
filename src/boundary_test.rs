use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::tracking::{MemoryLocation, MemorySink, NavigationTracker, TrackingConfig, TrackingError};

/// Records every call the boundary makes on its tracking capability.
#[derive(Clone, Default)]
struct CallLog {
    calls: Rc<RefCell<Vec<&'static str>>>,
}

impl CallLog {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }
}

struct FakeTracking {
    log: CallLog,
    fail_with: Option<&'static str>,
}

impl NavigationTracking for FakeTracking {
    type Error = &'static str;

    fn attach(&mut self) -> Result<(), Self::Error> {
        self.log.calls.borrow_mut().push("attach");
        match self.fail_with {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn detach(&mut self) {
        self.log.calls.borrow_mut().push("detach");
    }
}

fn fake() -> (ViewBoundary<FakeTracking>, CallLog) {
    let log = CallLog::default();
    let boundary = ViewBoundary::new(FakeTracking {
        log: log.clone(),
        fail_with: None,
    });
    (boundary, log)
}

fn tracked(url: &str) -> (ViewBoundary<crate::tracking::Attachment>, NavigationTracker, MemoryLocation, MemorySink) {
    let sink = MemorySink::new();
    let tracker = NavigationTracker::new(TrackingConfig::default(), sink.clone()).unwrap();
    let location = MemoryLocation::new(url);
    let boundary = ViewBoundary::new(tracker.attachment(location.clone()));
    (boundary, tracker, location, sink)
}

// =============================================================
// Output
// =============================================================

#[test]
fn every_render_yields_empty() {
    let (mut boundary, _log) = fake();
    for _ in 0..3 {
        assert_eq!(boundary.render(), Ok(Empty));
    }
}

#[test]
fn empty_output_survives_navigation_and_remount() {
    let (mut boundary, _tracker, location, _sink) = tracked("/a");
    assert_eq!(boundary.render().unwrap(), Empty);
    location.navigate("/b");
    assert_eq!(boundary.render().unwrap(), Empty);
    boundary.unmount();
    assert_eq!(boundary.render().unwrap(), Empty);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn new_boundary_is_unmounted_and_untouched() {
    let (boundary, log) = fake();
    assert_eq!(boundary.phase(), Phase::Unmounted);
    assert!(log.calls().is_empty());
}

#[test]
fn first_render_mounts_and_attaches_exactly_once() {
    let (mut boundary, log) = fake();

    boundary.render().unwrap();

    assert!(boundary.is_mounted());
    assert_eq!(log.calls(), vec!["attach"]);
}

#[test]
fn rerenders_request_attachment_each_pass() {
    let (mut boundary, log) = fake();
    for _ in 0..4 {
        boundary.render().unwrap();
    }
    assert_eq!(log.count("attach"), 4);
    assert_eq!(log.count("detach"), 0);
    assert_eq!(boundary.phase(), Phase::Mounted);
}

#[test]
fn unmount_detaches_once() {
    let (mut boundary, log) = fake();
    boundary.render().unwrap();

    boundary.unmount();
    boundary.unmount();

    assert_eq!(boundary.phase(), Phase::Unmounted);
    assert_eq!(log.calls(), vec!["attach", "detach"]);
}

#[test]
fn unmount_before_mount_is_noop() {
    let (mut boundary, log) = fake();
    boundary.unmount();
    assert!(log.calls().is_empty());
}

#[test]
fn drop_while_mounted_detaches() {
    let (mut boundary, log) = fake();
    boundary.render().unwrap();
    drop(boundary);
    assert_eq!(log.calls(), vec!["attach", "detach"]);
}

#[test]
fn drop_after_unmount_does_not_detach_twice() {
    let (mut boundary, log) = fake();
    boundary.render().unwrap();
    boundary.unmount();
    drop(boundary);
    assert_eq!(log.count("detach"), 1);
}

#[test]
fn attach_detach_pairs_never_interleave_across_remounts() {
    let (mut boundary, log) = fake();
    boundary.render().unwrap();
    boundary.render().unwrap();
    boundary.unmount();
    boundary.render().unwrap();
    boundary.unmount();

    assert_eq!(log.calls(), vec!["attach", "attach", "detach", "attach", "detach"]);
}

// =============================================================
// Errors
// =============================================================

#[test]
fn attach_error_propagates_unmodified() {
    let log = CallLog::default();
    let mut boundary = ViewBoundary::new(FakeTracking {
        log: log.clone(),
        fail_with: Some("collaborator misconfigured"),
    });

    assert_eq!(boundary.render(), Err("collaborator misconfigured"));
}

#[test]
fn failed_attach_still_mounts_so_detach_runs() {
    let log = CallLog::default();
    let mut boundary = ViewBoundary::new(FakeTracking {
        log: log.clone(),
        fail_with: Some("boom"),
    });

    let _ = boundary.render();
    assert!(boundary.is_mounted());
    boundary.unmount();

    assert_eq!(log.calls(), vec!["attach", "detach"]);
}

#[test]
fn tracker_delivery_error_reaches_host_as_is() {
    struct RejectingSink;
    impl crate::tracking::SignalSink for RejectingSink {
        fn send(&mut self, _view: &crate::tracking::PageView) -> Result<(), TrackingError> {
            Err(TrackingError::Delivery("quota exceeded".to_owned()))
        }
    }

    let tracker = NavigationTracker::new(TrackingConfig::default(), RejectingSink).unwrap();
    let mut boundary = ViewBoundary::new(tracker.attachment(MemoryLocation::new("/")));

    let err = boundary.render().unwrap_err();
    assert!(matches!(err, TrackingError::Delivery(ref msg) if msg == "quota exceeded"));
}

// =============================================================
// With the navigation tracker
// =============================================================

#[test]
fn mounting_tracks_the_initial_page_view() {
    let (mut boundary, _tracker, _location, sink) = tracked("/landing");
    boundary.render().unwrap();
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.signals()[0].state, "/landing");
}

#[test]
fn rerenders_without_navigation_emit_at_most_one_signal() {
    let (mut boundary, _tracker, _location, sink) = tracked("/steady");
    for _ in 0..10 {
        boundary.render().unwrap();
    }
    assert_eq!(sink.len(), 1);
}

#[test]
fn repeated_state_in_navigation_sequence_is_skipped() {
    let (mut boundary, _tracker, location, sink) = tracked("/a");
    for url in ["/a", "/b", "/b", "/c"] {
        location.navigate(url);
        boundary.render().unwrap();
    }
    let states: Vec<String> = sink.signals().into_iter().map(|v| v.state).collect();
    assert_eq!(states, vec!["/a", "/b", "/c"]);
}

#[test]
fn no_signal_after_unmount_even_when_location_changes() {
    let (mut boundary, tracker, location, sink) = tracked("/a");
    let mut other = tracker.attachment(location.clone());
    boundary.render().unwrap();
    other.sync().unwrap();
    assert_eq!(tracker.attachment_count(), 2);

    boundary.unmount();
    location.navigate("/elsewhere");
    other.sync().unwrap();

    assert!(!boundary.tracking().is_attached());
    assert_eq!(tracker.attachment_count(), 1);
    let states: Vec<String> = sink.signals().into_iter().map(|v| v.state).collect();
    assert_eq!(states, vec!["/a", "/elsewhere"]);

    other.detach();
    location.navigate("/gone");
    assert!(!tracker.is_active());
    assert_eq!(sink.len(), 2);
}

#[test]
fn mount_navigate_unmount_navigate_scenario() {
    let (mut boundary, tracker, location, sink) = tracked("/home");

    boundary.render().unwrap();
    assert_eq!(sink.len(), 1);

    location.navigate("/pricing");
    boundary.render().unwrap();
    assert_eq!(sink.len(), 2);
    assert_eq!(sink.signals()[1].state, "/pricing");

    boundary.unmount();
    assert!(!tracker.is_active());
    location.navigate("/contact");
    assert_eq!(sink.len(), 2);
}
