use super::*;

fn make_view(seq: u64, state: &str) -> PageView {
    PageView {
        id: Uuid::new_v4(),
        session_id: Uuid::nil(),
        seq,
        state: state.to_owned(),
        path: state.split('?').next().unwrap_or("/").to_owned(),
        referrer: None,
        ts: 0,
    }
}

struct FailingSink;

impl SignalSink for FailingSink {
    fn send(&mut self, _view: &PageView) -> Result<(), TrackingError> {
        Err(TrackingError::Delivery("sink offline".to_owned()))
    }
}

// =============================================================
// PageView wire shape
// =============================================================

#[test]
fn page_view_serializes_camel_case() {
    let view = PageView {
        referrer: Some("/home".to_owned()),
        ..make_view(2, "/docs?page=2")
    };
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["sessionId"], serde_json::json!(Uuid::nil().to_string()));
    assert_eq!(json["seq"], 2);
    assert_eq!(json["state"], "/docs?page=2");
    assert_eq!(json["path"], "/docs");
    assert_eq!(json["referrer"], "/home");
}

// =============================================================
// MemorySink
// =============================================================

#[test]
fn memory_sink_clones_share_buffer() {
    let sink = MemorySink::new();
    let mut writer = sink.clone();

    writer.send(&make_view(1, "/")).unwrap();

    assert_eq!(sink.len(), 1);
    assert_eq!(sink.signals()[0].state, "/");
    sink.clear();
    assert!(writer.is_empty());
}

// =============================================================
// FanoutSink
// =============================================================

#[test]
fn fanout_reaches_every_sink_and_returns_first_error() {
    let before = MemorySink::new();
    let after = MemorySink::new();
    let mut fanout = FanoutSink::new()
        .with(before.clone())
        .with(FailingSink)
        .with(after.clone());

    let err = fanout.send(&make_view(1, "/")).unwrap_err();

    assert!(matches!(err, TrackingError::Delivery(msg) if msg == "sink offline"));
    assert_eq!(before.len(), 1);
    assert_eq!(after.len(), 1);
}

#[test]
fn empty_fanout_accepts_views() {
    let mut fanout = FanoutSink::new();
    assert!(fanout.is_empty());
    assert!(fanout.send(&make_view(1, "/")).is_ok());
}

// =============================================================
// Console / beacon off the browser
// =============================================================

#[test]
fn console_sink_never_fails() {
    assert!(ConsoleSink.send(&make_view(1, "/")).is_ok());
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn beacon_sink_encodes_and_succeeds_off_the_browser() {
    let mut sink = BeaconSink::new("/_track");
    assert_eq!(sink.endpoint(), "/_track");
    assert!(sink.send(&make_view(1, "/")).is_ok());
}

// =============================================================
// default_sink
// =============================================================

#[test]
fn default_sink_is_empty_for_default_config() {
    assert!(default_sink(&TrackingConfig::default()).is_empty());
}

#[test]
fn default_sink_adds_beacon_and_console() {
    let config = TrackingConfig {
        debug: true,
        endpoint: Some("/_track".to_owned()),
        ..TrackingConfig::default()
    };
    assert_eq!(default_sink(&config).len(), 2);
}
