//! quakerun-core
//!
//! Core types, traits, and utilities shared across the quakerun workspace.
//!
//! - `types`: query specifications, event descriptions, and run configuration.
//! - `connector`: the collaborator traits consumed by the pipeline
//!   (`CatalogClient`, `DataRetriever`, `ComputeEngine`, `PostProcessor`).
//! - `inventory`: the hierarchical station-metadata model and merge helpers.
//! - `waveform`: retrieved waveform collections, pick times, and the run
//!   checkpoint.
//! - `output`: the structured result object returned by every pipeline run.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Collaborator traits are `async_trait` contracts; code driving them is
//! expected to run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Collaborator traits consumed by the pipeline orchestrator.
pub mod connector;
/// Unified error type for the quakerun workspace.
pub mod error;
/// Hierarchical station-metadata model and merge utilities.
pub mod inventory;
/// Structured run output returned by the orchestrator.
pub mod output;
pub mod types;
/// Waveform collections, pick times, and the run checkpoint.
pub mod waveform;

pub use connector::{CatalogClient, ComputeEngine, DataRetriever, PostProcessor};
pub use error::{QuakeError, error_chain};
pub use inventory::merge::{merge_all, merge_inventory};
pub use inventory::{Channel, FailureRecord, FetchResult, Inventory, Network, Station};
pub use output::RunOutput;
pub use types::*;
pub use waveform::{PickTimes, RunState, Trace, WaveformCollection};
