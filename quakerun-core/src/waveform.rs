//! Retrieved waveform collections, per-station pick times, and the run
//! checkpoint persisted between the retrieval and computational stages.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Theoretical P arrival times keyed by `"NET.STA"`, seconds since epoch.
pub type PickTimes = BTreeMap<String, f64>;

/// One retrieved waveform trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code.
    pub location: String,
    /// Channel code, e.g. `"BHZ"`.
    pub channel: String,
    /// Time of the first sample.
    pub start: DateTime<Utc>,
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
    /// Raw samples.
    pub samples: Vec<f64>,
}

impl Trace {
    /// Component letter of the channel code, if any.
    #[must_use]
    pub fn component(&self) -> Option<char> {
        self.channel.chars().last()
    }

    /// `"NET.STA"` identifier matching the pick-time map keys.
    #[must_use]
    pub fn station_id(&self) -> String {
        format!("{}.{}", self.network, self.station)
    }
}

/// An ordered collection of waveform traces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveformCollection {
    /// Traces in retrieval order.
    pub traces: Vec<Trace>,
}

impl WaveformCollection {
    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { traces: vec![] }
    }

    /// Number of traces held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the collection holds no traces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Keep only traces whose channel component matches (case-insensitive).
    #[must_use]
    pub fn select_component(self, component: char) -> Self {
        let want = component.to_ascii_uppercase();
        Self {
            traces: self
                .traces
                .into_iter()
                .filter(|t| t.component().map(|c| c.to_ascii_uppercase()) == Some(want))
                .collect(),
        }
    }

    /// Append another collection's traces, preserving order.
    pub fn extend(&mut self, other: Self) {
        self.traces.extend(other.traces);
    }
}

/// Checkpoint persisted to the working directory after data retrieval,
/// before the computational stage runs. Lets the inversion be retried
/// without re-fetching data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Per-station pick-time map accumulated across sources.
    pub pick_times: PickTimes,
    /// Combined waveform collection across sources.
    pub streams: WaveformCollection,
}
