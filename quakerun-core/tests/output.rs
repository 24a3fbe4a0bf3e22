use quakerun_core::error::error_chain;
use quakerun_core::output::{ERROR_KEY, ERROR_TRACE_KEY};
use quakerun_core::{QuakeError, QueryScope, RunOutput};
use serde_json::json;

#[test]
fn warnings_accumulate_in_order() {
    let mut out = RunOutput::new();
    out.add_warning("first");
    out.add_warning("second");
    assert_eq!(out.warnings, vec!["first", "second"]);
    assert!(!out.is_fatal());
}

#[test]
fn set_fatal_populates_both_reserved_keys() {
    let mut out = RunOutput::new();
    out.insert("inversion", json!({"mw": 7.5}));
    out.set_fatal("boom", "boom\ncaused by: io");

    assert!(out.is_fatal());
    assert_eq!(out.fatal_error(), Some("boom"));
    assert!(out.error_trace().unwrap().contains("caused by"));
    assert!(out.get(ERROR_KEY).is_some());
    assert!(out.get(ERROR_TRACE_KEY).is_some());
    // Stage artifacts survive alongside the error pair.
    assert_eq!(out.get("inversion").unwrap()["mw"], json!(7.5));
}

#[test]
fn error_chain_walks_sources() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = QuakeError::from(io);
    let chain = error_chain(&err);
    assert!(chain.starts_with("i/o error"));
    assert!(chain.contains("caused by: denied"));
}

#[test]
fn failure_record_renders_one_readable_line() {
    let rec = quakerun_core::FailureRecord {
        scope: QueryScope::Channel,
        network: Some("IU".into()),
        station: Some("ANMO".into()),
        channel: Some("BHZ".into()),
        reason: "timeout".into(),
    };
    assert_eq!(rec.to_string(), "channel IU.ANMO.BHZ: timeout");

    let global = quakerun_core::FailureRecord {
        scope: QueryScope::Global,
        network: None,
        station: None,
        channel: None,
        reason: "payload too large".into(),
    };
    assert_eq!(global.to_string(), "global *: payload too large");
}
