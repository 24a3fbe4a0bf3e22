//! Deterministic mocks for the quakerun pipeline: a scriptable catalog
//! client plus retrieval, compute, and post-processing collaborators.
//!
//! `MockCatalog` holds a fixture inventory (the "world") and serves scoped
//! queries from it the way a real catalog would: enumeration queries return
//! stripped-down entries, response queries return full metadata, and deny
//! rules make selected query shapes fail so tests can drive every branch of
//! the fetch cascade.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use quakerun_core::inventory::Inventory;
use quakerun_core::{
    AcquisitionParams, CatalogClient, Channel, ComputeEngine, DataRetriever, DetailLevel,
    EventInfo, Network, PickTimes, PostProcessor, ProcessingParams, QuakeError, QueryScope,
    QuerySpec, RunOutput, Station, Trace, WaveformCollection,
};

pub mod fixtures;

/// Match a channel code against a `?`-wildcard pattern (e.g. `"BH?"`).
#[must_use]
pub fn matches_pattern(code: &str, pattern: &str) -> bool {
    code.len() == pattern.len()
        && code
            .chars()
            .zip(pattern.chars())
            .all(|(c, p)| p == '?' || c == p)
}

#[derive(Debug, Clone)]
struct DenyRule {
    scope: QueryScope,
    detail: Option<DetailLevel>,
    network: Option<String>,
    station: Option<String>,
    channel: Option<String>,
}

impl DenyRule {
    fn matches(&self, spec: &QuerySpec) -> bool {
        self.scope == spec.scope
            && self.detail.is_none_or(|d| d == spec.detail)
            && match_opt(&self.network, &spec.network)
            && match_opt(&self.station, &spec.station)
            && self
                .channel
                .as_ref()
                .is_none_or(|c| c == &spec.channel)
    }
}

fn match_opt(rule: &Option<String>, field: &Option<String>) -> bool {
    rule.as_ref()
        .is_none_or(|want| field.as_deref() == Some(want.as_str()))
}

/// Scriptable in-memory catalog client.
pub struct MockCatalog {
    name: String,
    world: Inventory,
    deny: Vec<DenyRule>,
    calls: AtomicUsize,
}

impl MockCatalog {
    /// Start building a catalog for the given fixture inventory.
    #[must_use]
    pub fn builder(world: Inventory) -> MockCatalogBuilder {
        MockCatalogBuilder {
            name: "mock://catalog".to_string(),
            world,
            deny: vec![],
        }
    }

    /// Number of queries served (or denied) so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve(&self, spec: &QuerySpec) -> Inventory {
        let networks = self
            .world
            .networks
            .iter()
            .filter(|n| match &spec.network {
                Some(code) => &n.code == code,
                None => spec.networks.is_empty() || spec.networks.contains(&n.code),
            })
            .map(|n| serve_network(n, spec))
            .collect();
        Inventory { networks }
    }
}

fn serve_network(net: &Network, spec: &QuerySpec) -> Network {
    if spec.detail == DetailLevel::Network {
        return Network {
            code: net.code.clone(),
            stations: vec![],
        };
    }
    let stations = net
        .stations
        .iter()
        .filter(|s| match &spec.station {
            Some(code) => &s.code == code,
            None => true,
        })
        .map(|s| serve_station(s, spec))
        .collect();
    Network {
        code: net.code.clone(),
        stations,
    }
}

fn serve_station(sta: &Station, spec: &QuerySpec) -> Station {
    let channels = if spec.detail == DetailLevel::Station {
        vec![]
    } else {
        sta.channels
            .iter()
            .filter(|c| matches_pattern(&c.code, &spec.channel))
            .map(|c| Channel {
                response: if spec.detail == DetailLevel::Response {
                    c.response.clone()
                } else {
                    None
                },
                ..c.clone()
            })
            .collect()
    };
    Station {
        code: sta.code.clone(),
        latitude: sta.latitude,
        longitude: sta.longitude,
        channels,
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, spec: &QuerySpec) -> Result<Inventory, QuakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(rule) = self.deny.iter().find(|r| r.matches(spec)) {
            return Err(QuakeError::catalog(
                &self.name,
                format!("denied {} query at {:?} detail", rule.scope, spec.detail),
            ));
        }
        Ok(self.serve(spec))
    }
}

/// Builder for [`MockCatalog`].
pub struct MockCatalogBuilder {
    name: String,
    world: Inventory,
    deny: Vec<DenyRule>,
}

impl MockCatalogBuilder {
    /// Override the catalog's source name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Deny every query matching the given shape.
    #[must_use]
    pub fn deny(
        mut self,
        scope: QueryScope,
        detail: Option<DetailLevel>,
        network: Option<&str>,
        station: Option<&str>,
        channel: Option<&str>,
    ) -> Self {
        self.deny.push(DenyRule {
            scope,
            detail,
            network: network.map(str::to_string),
            station: station.map(str::to_string),
            channel: channel.map(str::to_string),
        });
        self
    }

    /// Deny the broad Global/Response query, forcing the cascade to degrade.
    #[must_use]
    pub fn deny_global(self) -> Self {
        self.deny(QueryScope::Global, Some(DetailLevel::Response), None, None, None)
    }

    /// Deny the network-scope Response query for one network.
    #[must_use]
    pub fn deny_network(self, network: &str) -> Self {
        self.deny(
            QueryScope::Network,
            Some(DetailLevel::Response),
            Some(network),
            None,
            None,
        )
    }

    /// Deny the station-scope Response query for one station.
    #[must_use]
    pub fn deny_station(self, network: &str, station: &str) -> Self {
        self.deny(
            QueryScope::Station,
            Some(DetailLevel::Response),
            Some(network),
            Some(station),
            None,
        )
    }

    /// Deny the channel-scope Response query for one channel.
    #[must_use]
    pub fn deny_channel(self, network: &str, station: &str, channel: &str) -> Self {
        self.deny(
            QueryScope::Channel,
            Some(DetailLevel::Response),
            Some(network),
            Some(station),
            Some(channel),
        )
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> MockCatalog {
        MockCatalog {
            name: self.name,
            world: self.world,
            deny: self.deny,
            calls: AtomicUsize::new(0),
        }
    }
}

/// Deterministic waveform retriever: one synthetic trace per channel in the
/// inventory and one pick time per station.
pub struct MockRetriever {
    /// Force retrieval to fail with this message.
    pub fail_with: Option<String>,
    /// Samples placed in every synthetic trace.
    pub samples_per_trace: usize,
}

impl Default for MockRetriever {
    fn default() -> Self {
        Self {
            fail_with: None,
            samples_per_trace: 16,
        }
    }
}

impl MockRetriever {
    /// A retriever that always fails.
    #[must_use]
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            samples_per_trace: 0,
        }
    }
}

#[async_trait]
impl DataRetriever for MockRetriever {
    async fn retrieve(
        &self,
        event: &EventInfo,
        inventory: &Inventory,
        params: &AcquisitionParams,
    ) -> Result<(WaveformCollection, PickTimes), QuakeError> {
        if let Some(msg) = &self.fail_with {
            return Err(QuakeError::collaborator("retrieve", msg.clone()));
        }
        let mut streams = WaveformCollection::new();
        let mut picks = PickTimes::new();
        for net in &inventory.networks {
            for sta in &net.stations {
                if params.add_ptime {
                    #[allow(clippy::cast_precision_loss)]
                    let pick = event.origin_time.timestamp() as f64 + 60.0;
                    picks.insert(format!("{}.{}", net.code, sta.code), pick);
                }
                for cha in &sta.channels {
                    streams.traces.push(Trace {
                        network: net.code.clone(),
                        station: sta.code.clone(),
                        location: cha.location.clone(),
                        channel: cha.code.clone(),
                        start: event.origin_time,
                        sampling_rate: cha.sampling_rate,
                        samples: vec![0.0; self.samples_per_trace],
                    });
                }
            }
        }
        Ok((streams, picks))
    }
}

/// Scripted outcome of a [`MockEngine`] invocation.
pub enum EngineOutcome {
    /// Succeed with the given structured result.
    Ok(Value),
    /// Fail with a recoverable computation warning.
    Warning(String),
    /// Fail fatally.
    Error(String),
}

/// Compute engine returning a scripted outcome.
pub struct MockEngine {
    outcome: EngineOutcome,
}

impl MockEngine {
    /// An engine that succeeds with a small fixture result.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            outcome: EngineOutcome::Ok(json!({ "mw": 7.5, "depth_km": 35.0 })),
        }
    }

    /// An engine with a custom scripted outcome.
    #[must_use]
    pub const fn with_outcome(outcome: EngineOutcome) -> Self {
        Self { outcome }
    }

    /// An engine that raises a recoverable warning.
    #[must_use]
    pub fn warning(msg: &str) -> Self {
        Self::with_outcome(EngineOutcome::Warning(msg.to_string()))
    }

    /// An engine that fails fatally.
    #[must_use]
    pub fn failing(msg: &str) -> Self {
        Self::with_outcome(EngineOutcome::Error(msg.to_string()))
    }
}

#[async_trait]
impl ComputeEngine for MockEngine {
    async fn invoke(
        &self,
        _streams: &WaveformCollection,
        _pick_times: &PickTimes,
        _event: &EventInfo,
        _params: &ProcessingParams,
    ) -> Result<Value, QuakeError> {
        match &self.outcome {
            EngineOutcome::Ok(v) => Ok(v.clone()),
            EngineOutcome::Warning(msg) => Err(QuakeError::ComputeWarning(msg.clone())),
            EngineOutcome::Error(msg) => Err(QuakeError::collaborator("compute", msg.clone())),
        }
    }
}

/// Post-processor that records what it saw, or fails on request.
pub struct MockPostProcessor {
    /// Force post-processing to fail with this message.
    pub fail_with: Option<String>,
}

impl MockPostProcessor {
    /// A post-processor that enriches the output and succeeds.
    #[must_use]
    pub const fn ok() -> Self {
        Self { fail_with: None }
    }

    /// A post-processor that always fails.
    #[must_use]
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait]
impl PostProcessor for MockPostProcessor {
    async fn process(
        &self,
        result: &Value,
        output: &mut RunOutput,
        _event: &EventInfo,
        pick_times: &PickTimes,
        _working_dir: &Path,
    ) -> Result<(), QuakeError> {
        if let Some(msg) = &self.fail_with {
            return Err(QuakeError::collaborator("post-process", msg.clone()));
        }
        output.insert("post_processed", json!(true));
        output.insert("stations_used", json!(pick_times.len()));
        output.insert("summary", result.clone());
        Ok(())
    }
}
