//! Hierarchical station-metadata model: networks own stations, stations own
//! channels, channels carry instrument response metadata.

pub mod merge;

use serde::{Deserialize, Serialize};

use crate::types::QueryScope;

/// Instrument response metadata attached to a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentResponse {
    /// Overall sensitivity (counts per m/s).
    pub sensitivity: f64,
    /// Normalization factor of the transfer function.
    pub gain: f64,
    /// Poles of the transfer function as (re, im) pairs.
    pub poles: Vec<(f64, f64)>,
    /// Zeros of the transfer function as (re, im) pairs.
    pub zeros: Vec<(f64, f64)>,
}

/// A single channel entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel code, e.g. `"BHZ"`.
    pub code: String,
    /// Location code, often empty or `"00"`.
    pub location: String,
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Response metadata; present when the query was made at Response detail.
    pub response: Option<InstrumentResponse>,
}

impl Channel {
    /// Component letter of the channel code (`'Z'` for `"BHZ"`), if any.
    #[must_use]
    pub fn component(&self) -> Option<char> {
        self.code.chars().last()
    }
}

/// A station entry owning its channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station code, e.g. `"ANMO"`.
    pub code: String,
    /// Station latitude, degrees.
    pub latitude: f64,
    /// Station longitude, degrees.
    pub longitude: f64,
    /// Channels in enumeration order.
    pub channels: Vec<Channel>,
}

/// A network entry owning its stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Network code, e.g. `"IU"`.
    pub code: String,
    /// Stations in enumeration order.
    pub stations: Vec<Station>,
}

/// An ordered collection of network entries.
///
/// A merged inventory exclusively owns every entry it contains; merging
/// consumes the incoming inventory rather than aliasing entries across two
/// collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Networks in enumeration order.
    pub networks: Vec<Network>,
}

impl Inventory {
    /// An inventory with no entries.
    #[must_use]
    pub const fn new() -> Self {
        Self { networks: vec![] }
    }

    /// Whether the inventory holds no networks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Total number of channel entries across all networks and stations.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.networks
            .iter()
            .flat_map(|n| &n.stations)
            .map(|s| s.channels.len())
            .sum()
    }
}

/// Record of a query that failed after fallback was exhausted.
///
/// Collected in arrival order; ordering aids debugging but carries no
/// semantic weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Scope at which the failed query was framed.
    pub scope: QueryScope,
    /// Network code, when the failure is below Global scope.
    pub network: Option<String>,
    /// Station code, when the failure is below Network scope.
    pub station: Option<String>,
    /// Channel code, for Channel-scope failures.
    pub channel: Option<String>,
    /// Free-text cause reported by the catalog client.
    pub reason: String,
}

impl FailureRecord {
    fn identifier(&self) -> String {
        let mut id = String::new();
        for part in [&self.network, &self.station, &self.channel]
            .into_iter()
            .flatten()
        {
            if !id.is_empty() {
                id.push('.');
            }
            id.push_str(part);
        }
        if id.is_empty() { "*".to_string() } else { id }
    }
}

impl std::fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.scope, self.identifier(), self.reason)
    }
}

/// Outcome of one fetch-cascade invocation. Immutable after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    /// Identifier of the catalog source (typically its service URL).
    pub source: String,
    /// Merged inventory across every query that succeeded.
    pub inventory: Inventory,
    /// Failures recorded where fallback was exhausted, in arrival order.
    pub failures: Vec<FailureRecord>,
}
