//! Deterministic inventory and event fixtures for tests and examples.

use chrono::{TimeZone, Utc};
use quakerun_core::inventory::InstrumentResponse;
use quakerun_core::{Channel, EventInfo, Inventory, Network, Station};

/// The 2015 Mw 7.5 Kokopo (New Britain) earthquake, usable wherever a
/// plausible event description is needed.
#[must_use]
pub fn event() -> EventInfo {
    EventInfo {
        latitude: -3.3,
        longitude: 152.2,
        depth_km: 35.0,
        origin_time: Utc.with_ymd_and_hms(2015, 3, 29, 23, 48, 31).unwrap(),
        magnitude: Some(7.5),
    }
}

/// A flat instrument response usable wherever Response detail is expected.
#[must_use]
pub fn flat_response() -> InstrumentResponse {
    InstrumentResponse {
        sensitivity: 3.26e9,
        gain: 1.0,
        poles: vec![(-0.037, 0.037), (-0.037, -0.037)],
        zeros: vec![(0.0, 0.0), (0.0, 0.0)],
    }
}

/// A broadband channel carrying full response metadata.
#[must_use]
pub fn channel(code: &str) -> Channel {
    Channel {
        code: code.to_string(),
        location: "00".to_string(),
        sampling_rate: 20.0,
        response: Some(flat_response()),
    }
}

/// A station with the three broadband components.
#[must_use]
pub fn station(code: &str, latitude: f64, longitude: f64) -> Station {
    Station {
        code: code.to_string(),
        latitude,
        longitude,
        channels: vec![channel("BHZ"), channel("BHN"), channel("BHE")],
    }
}

/// A network populated with the given stations.
#[must_use]
pub fn network(code: &str, stations: Vec<Station>) -> Network {
    Network {
        code: code.to_string(),
        stations,
    }
}

/// Two-network inventory used by most cascade tests: `IU` with two stations
/// and `II` with one.
#[must_use]
pub fn two_network_world() -> Inventory {
    Inventory {
        networks: vec![
            network(
                "IU",
                vec![station("ANMO", 34.9, -106.5), station("KIP", 21.4, -158.0)],
            ),
            network("II", vec![station("AAK", 42.6, 74.5)]),
        ],
    }
}
