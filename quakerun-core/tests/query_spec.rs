use chrono::{Duration, TimeZone, Utc};
use quakerun_core::{DetailLevel, EventInfo, QuakeError, QueryScope, QuerySpec};

fn event() -> EventInfo {
    EventInfo {
        latitude: -3.3,
        longitude: 152.2,
        depth_km: 35.0,
        origin_time: Utc.with_ymd_and_hms(2015, 3, 29, 23, 48, 31).unwrap(),
        magnitude: Some(7.5),
    }
}

fn base() -> QuerySpec {
    QuerySpec::for_event(
        &event(),
        (5.0, 90.0),
        &["II".to_string(), "IU".to_string()],
        Duration::hours(1),
        Duration::hours(1),
    )
}

#[test]
fn for_event_builds_a_global_response_spec() {
    let spec = base();
    assert_eq!(spec.scope, QueryScope::Global);
    assert_eq!(spec.detail, DetailLevel::Response);
    assert_eq!(spec.networks, vec!["II", "IU"]);
    assert_eq!(spec.channel, "BH?");
    assert!(spec.validate().is_ok());
    assert_eq!((spec.end - spec.start).num_hours(), 2);
}

#[test]
fn all_keyword_clears_the_network_filter() {
    let spec = QuerySpec::for_event(
        &event(),
        (5.0, 90.0),
        &["all".to_string()],
        Duration::hours(1),
        Duration::hours(1),
    );
    assert!(spec.networks.is_empty());
}

#[test]
fn narrow_sets_only_the_identifiers_the_scope_needs() {
    let spec = base();

    let net = spec.narrow(
        QueryScope::Network,
        DetailLevel::Response,
        Some("IU"),
        Some("ANMO"),
        None,
    );
    assert_eq!(net.network.as_deref(), Some("IU"));
    assert!(net.station.is_none());
    assert_eq!(net.channel, spec.channel);
    assert!((net.latitude - spec.latitude).abs() < f64::EPSILON);

    let cha = spec.narrow(
        QueryScope::Channel,
        DetailLevel::Response,
        Some("IU"),
        Some("ANMO"),
        Some("BHZ"),
    );
    assert_eq!(cha.station.as_deref(), Some("ANMO"));
    assert_eq!(cha.channel, "BHZ");
    assert!(cha.validate().is_ok());
}

#[test]
fn validate_rejects_missing_identifiers() {
    let spec = base().narrow(QueryScope::Station, DetailLevel::Response, Some("IU"), None, None);
    assert!(matches!(
        spec.validate(),
        Err(QuakeError::InvalidConfig(_))
    ));
}

#[test]
fn validate_rejects_inverted_radius_and_window() {
    let mut spec = base();
    spec.min_radius = 91.0;
    assert!(spec.validate().is_err());

    let mut spec = base();
    spec.end = spec.start;
    assert!(spec.validate().is_err());
}
