use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::QuakeError;
use crate::inventory::Inventory;
use crate::output::RunOutput;
use crate::types::{AcquisitionParams, EventInfo, ProcessingParams, QuerySpec};
use crate::waveform::{PickTimes, WaveformCollection};

/// Contract of the remote catalog service consumed by the fetch cascade.
///
/// Implementations issue one scoped metadata query per call and fail with a
/// generic [`QuakeError`] on network, protocol, or scope problems; the
/// cascade treats every failure identically regardless of cause.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// A stable identifier for the catalog source, typically its URL.
    fn name(&self) -> &str;

    /// Issue one scoped metadata query.
    async fn query(&self, spec: &QuerySpec) -> Result<Inventory, QuakeError>;
}

/// Contract of the waveform-retrieval collaborator.
#[async_trait]
pub trait DataRetriever: Send + Sync {
    /// Retrieve waveforms and theoretical pick times for the stations in
    /// `inventory`, windowed around the event per `params`.
    async fn retrieve(
        &self,
        event: &EventInfo,
        inventory: &Inventory,
        params: &AcquisitionParams,
    ) -> Result<(WaveformCollection, PickTimes), QuakeError>;
}

/// Contract of the computational (inversion) collaborator.
///
/// Invocations are opaque, non-interruptible blocking calls with no timeout;
/// long-running inversions are bounded by external process supervision. The
/// engine may size an internal worker pool from
/// [`ProcessingParams::n_workers`].
#[async_trait]
pub trait ComputeEngine: Send + Sync {
    /// Run the inversion.
    ///
    /// # Errors
    /// `QuakeError::ComputeWarning` signals a degraded but usable outcome;
    /// any other error is fatal for the run.
    async fn invoke(
        &self,
        streams: &WaveformCollection,
        pick_times: &PickTimes,
        event: &EventInfo,
        params: &ProcessingParams,
    ) -> Result<Value, QuakeError>;
}

/// Contract of the post-processing collaborator. Enriches the run output in
/// place from the computational result and the accumulated metadata.
#[async_trait]
pub trait PostProcessor: Send + Sync {
    /// Post-process the inversion result into `output`.
    async fn process(
        &self,
        result: &Value,
        output: &mut RunOutput,
        event: &EventInfo,
        pick_times: &PickTimes,
        working_dir: &Path,
    ) -> Result<(), QuakeError>;
}
