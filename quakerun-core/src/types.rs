//! Query specifications, event descriptions, and run configuration.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::QuakeError;
use crate::inventory::Inventory;

/// Granularity level at which a metadata query is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryScope {
    /// One query covering all requested networks.
    Global,
    /// Scoped to a single network.
    Network,
    /// Scoped to a single station within a network.
    Station,
    /// Scoped to a single channel within a station.
    Channel,
}

impl std::fmt::Display for QueryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Global => "global",
            Self::Network => "network",
            Self::Station => "station",
            Self::Channel => "channel",
        };
        f.write_str(s)
    }
}

/// How much response/instrument information a query requests, independent
/// of its scope. Enumeration queries use the lightweight levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailLevel {
    /// Network names only.
    Network,
    /// Stations without channel listings.
    Station,
    /// Channels without response metadata.
    Channel,
    /// Full instrument response metadata.
    Response,
}

/// A scoped metadata query against a catalog service.
///
/// The broadest spec is built with [`QuerySpec::for_event`]; the fetch
/// cascade derives narrower specs from it with [`QuerySpec::narrow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Granularity at which this query is framed.
    pub scope: QueryScope,
    /// Requested detail level.
    pub detail: DetailLevel,
    /// Network codes requested at `Global` scope; empty means all networks.
    pub networks: Vec<String>,
    /// Network code, required for `Network` scope and narrower.
    pub network: Option<String>,
    /// Station code, required for `Station` scope and narrower.
    pub station: Option<String>,
    /// Channel code or `?`-pattern (e.g. `"BH?"`); an exact code at
    /// `Channel` scope.
    pub channel: String,
    /// Geographic center latitude, degrees.
    pub latitude: f64,
    /// Geographic center longitude, degrees.
    pub longitude: f64,
    /// Minimum epicentral distance, degrees.
    pub min_radius: f64,
    /// Maximum epicentral distance, degrees.
    pub max_radius: f64,
    /// Start of the window in which the station must exist.
    pub start: DateTime<Utc>,
    /// End of the existence window.
    pub end: DateTime<Utc>,
}

/// Default channel pattern for broadband metadata queries.
pub const DEFAULT_CHANNEL_PATTERN: &str = "BH?";

impl QuerySpec {
    /// Build the broadest (Global scope, Response detail) spec for an event.
    ///
    /// `t_before` / `t_after` pad the existence window around the origin
    /// time; an hour on either side is plenty since the window only filters
    /// station existence, not waveforms. A `networks` entry of `"ALL"`
    /// (case-insensitive) clears the network filter.
    #[must_use]
    pub fn for_event(
        event: &EventInfo,
        dist_range: (f64, f64),
        networks: &[String],
        t_before: Duration,
        t_after: Duration,
    ) -> Self {
        let networks: Vec<String> = if networks.iter().any(|n| n.eq_ignore_ascii_case("ALL")) {
            vec![]
        } else {
            networks.to_vec()
        };
        Self {
            scope: QueryScope::Global,
            detail: DetailLevel::Response,
            networks,
            network: None,
            station: None,
            channel: DEFAULT_CHANNEL_PATTERN.to_string(),
            latitude: event.latitude,
            longitude: event.longitude,
            min_radius: dist_range.0,
            max_radius: dist_range.1,
            start: event.origin_time - t_before,
            end: event.origin_time + t_after,
        }
    }

    /// Derive a narrower spec from this one.
    ///
    /// Pure function: the base spec is left untouched and the identifiers
    /// for the target scope are passed explicitly. Identifiers for levels
    /// narrower than `scope` are ignored.
    #[must_use]
    pub fn narrow(
        &self,
        scope: QueryScope,
        detail: DetailLevel,
        network: Option<&str>,
        station: Option<&str>,
        channel: Option<&str>,
    ) -> Self {
        let mut spec = self.clone();
        spec.scope = scope;
        spec.detail = detail;
        spec.network = match scope {
            QueryScope::Global => None,
            _ => network.map(str::to_string),
        };
        spec.station = match scope {
            QueryScope::Station | QueryScope::Channel => station.map(str::to_string),
            _ => None,
        };
        if scope == QueryScope::Channel {
            if let Some(cha) = channel {
                spec.channel = cha.to_string();
            }
        }
        spec
    }

    /// Check the scope/identifier invariant: every field required by the
    /// spec's scope must be present.
    ///
    /// # Errors
    /// Returns `QuakeError::InvalidConfig` naming the missing field.
    pub fn validate(&self) -> Result<(), QuakeError> {
        match self.scope {
            QueryScope::Global => {}
            QueryScope::Network => {
                if self.network.is_none() {
                    return Err(QuakeError::invalid_config(
                        "network-scope query requires a network code",
                    ));
                }
            }
            QueryScope::Station => {
                if self.network.is_none() || self.station.is_none() {
                    return Err(QuakeError::invalid_config(
                        "station-scope query requires network and station codes",
                    ));
                }
            }
            QueryScope::Channel => {
                if self.network.is_none() || self.station.is_none() {
                    return Err(QuakeError::invalid_config(
                        "channel-scope query requires network and station codes",
                    ));
                }
            }
        }
        if self.min_radius > self.max_radius {
            return Err(QuakeError::invalid_config(
                "minimum radius exceeds maximum radius",
            ));
        }
        if self.start >= self.end {
            return Err(QuakeError::invalid_config(
                "query time window is empty or inverted",
            ));
        }
        Ok(())
    }
}

/// Description of the seismic event a run is scoped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Hypocenter latitude, degrees.
    pub latitude: f64,
    /// Hypocenter longitude, degrees.
    pub longitude: f64,
    /// Hypocenter depth, kilometers.
    pub depth_km: f64,
    /// Origin time.
    pub origin_time: DateTime<Utc>,
    /// Preliminary magnitude, when known.
    pub magnitude: Option<f64>,
}

impl std::fmt::Display for EventInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat={} lon={} depth_km={} time={}",
            self.latitude, self.longitude, self.depth_km, self.origin_time
        )
    }
}

/// A catalog/waveform service descriptor (typically a service URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Service URL or label used in diagnostics and artifacts.
    pub name: String,
}

impl DataSource {
    /// Build a descriptor from a service URL or label.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Parameters handed to the data-retrieval collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionParams {
    /// Scale factor for the W-phase time window.
    pub wp_tw_factor: f64,
    /// Seconds of data requested before the P arrival.
    pub t_before_p: f64,
    /// Seconds of data requested after the W-phase window.
    pub t_after_wp: f64,
    /// Whether to compute and attach theoretical P arrival times.
    pub add_ptime: bool,
    /// Number of channels per bulk waveform request.
    pub bulk_chunk_len: usize,
    /// Distance cutoffs used to prune redundant stations, when set.
    pub prune_cutoffs: Option<Vec<f64>>,
    /// Keep only vertical-component traces after retrieval.
    pub use_only_vertical: bool,
}

impl Default for AcquisitionParams {
    fn default() -> Self {
        Self {
            wp_tw_factor: 15.0,
            t_before_p: 1500.0,
            t_after_wp: 60.0,
            add_ptime: true,
            bulk_chunk_len: 200,
            prune_cutoffs: None,
            use_only_vertical: true,
        }
    }
}

/// Parameters handed to the computational collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingParams {
    /// Location of the precomputed Green's functions.
    pub greens_functions_dir: PathBuf,
    /// Size of the engine's internal worker pool; 0 lets the engine decide.
    pub n_workers: usize,
    /// Output/processing level requested from the engine.
    pub processing_level: u8,
    /// Station identifiers excluded from the inversion.
    pub stations_to_exclude: Vec<String>,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            greens_functions_dir: PathBuf::new(),
            n_workers: 0,
            processing_level: 3,
            stations_to_exclude: vec![],
        }
    }
}

/// Configuration for one pipeline run.
///
/// Built with [`RunConfig::builder`]. Validation happens in the
/// orchestrator's Init stage, before any I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Working directory for this run's artifacts. Use an absolute path.
    pub output_dir: PathBuf,
    /// Catalog/waveform sources, queried in order.
    pub sources: Vec<DataSource>,
    /// Pre-supplied inventories, one per source, bypassing the fetch cascade.
    pub inventories: Option<Vec<Inventory>>,
    /// The event this run is scoped to. Required.
    pub event: Option<EventInfo>,
    /// Requested network codes; empty (or `"ALL"`) means all networks.
    pub networks: Vec<String>,
    /// Epicentral distance range (min, max) in degrees.
    pub dist_range: (f64, f64),
    /// Data-retrieval parameters.
    pub acquisition: AcquisitionParams,
    /// Computational-stage parameters.
    pub processing: ProcessingParams,
    /// Accept a pre-existing output directory instead of rejecting it.
    pub output_dir_can_exist: bool,
}

impl RunConfig {
    /// Start building a run configuration for the given working directory.
    pub fn builder(output_dir: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder::new(output_dir)
    }
}

/// Builder for [`RunConfig`].
pub struct RunConfigBuilder {
    cfg: RunConfig,
}

impl RunConfigBuilder {
    /// Create a builder with default acquisition and processing parameters.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            cfg: RunConfig {
                output_dir: output_dir.into(),
                sources: vec![],
                inventories: None,
                event: None,
                networks: vec![],
                dist_range: (5.0, 90.0),
                acquisition: AcquisitionParams::default(),
                processing: ProcessingParams::default(),
                output_dir_can_exist: false,
            },
        }
    }

    /// Add a catalog/waveform source.
    #[must_use]
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.cfg.sources.push(source);
        self
    }

    /// Supply pre-fetched inventories, one per source, in source order.
    #[must_use]
    pub fn with_inventories(mut self, inventories: Vec<Inventory>) -> Self {
        self.cfg.inventories = Some(inventories);
        self
    }

    /// Set the event description. Required before `run`.
    #[must_use]
    pub fn event(mut self, event: EventInfo) -> Self {
        self.cfg.event = Some(event);
        self
    }

    /// Restrict acquisition to the given network codes.
    #[must_use]
    pub fn networks(mut self, networks: &[&str]) -> Self {
        self.cfg.networks = networks.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Set the epicentral distance range in degrees.
    #[must_use]
    pub const fn dist_range(mut self, min_deg: f64, max_deg: f64) -> Self {
        self.cfg.dist_range = (min_deg, max_deg);
        self
    }

    /// Replace the data-retrieval parameters.
    #[must_use]
    pub fn acquisition(mut self, params: AcquisitionParams) -> Self {
        self.cfg.acquisition = params;
        self
    }

    /// Replace the computational-stage parameters.
    #[must_use]
    pub fn processing(mut self, params: ProcessingParams) -> Self {
        self.cfg.processing = params;
        self
    }

    /// Permit reuse of an existing output directory.
    #[must_use]
    pub const fn output_dir_can_exist(mut self, yes: bool) -> Self {
        self.cfg.output_dir_can_exist = yes;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> RunConfig {
        self.cfg
    }
}
