//! quakerun sequences seismic metadata acquisition and downstream processing
//! into a single auditable pipeline run.
//!
//! Overview
//! - The fetch cascade ([`fetch_inventory`]) degrades one broad catalog
//!   query into a tree of narrower queries when the broad query fails,
//!   merging partial results and recording per-leaf failures instead of
//!   aborting.
//! - The orchestrator ([`Pipeline`]) sequences metadata acquisition →
//!   waveform retrieval → inversion → post-processing, persists
//!   intermediate state to the run's working directory, and funnels every
//!   recoverable and fatal condition into one structured [`RunOutput`].
//!
//! Key behaviors and trade-offs
//! - Broad-query-first: a single Global/Response query costs one round trip
//!   when the catalog can serve it; the cascade trades latency for
//!   completeness when it cannot, and one bad branch never starves its
//!   siblings.
//! - Failure topology: below the cascade's leaves, errors become data
//!   (`FailureRecord`s). Before any output exists (Init, AcquireMetadata)
//!   errors propagate to the caller. From data retrieval onward the run
//!   always returns a `RunOutput`, with fatal conditions captured under its
//!   reserved error keys.
//! - The checkpoint written after retrieval lets the computational stage be
//!   retried without re-fetching data.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quakerun::Pipeline;
//! use quakerun_core::{DataSource, EventInfo, RunConfig};
//!
//! let pipeline = Pipeline::builder()
//!     .with_catalog(Arc::new(client))
//!     .retriever(Arc::new(retriever))
//!     .engine(Arc::new(engine))
//!     .post_processor(Arc::new(post))
//!     .build()?;
//!
//! let cfg = RunConfig::builder("/data/runs/2015-03-29")
//!     .with_source(DataSource::new("http://service.iris.edu"))
//!     .event(event)
//!     .networks(&["II", "IU"])
//!     .build();
//!
//! let output = pipeline.run(cfg).await?;
//! ```
#![warn(missing_docs)]

/// Working-directory artifact persistence.
pub mod artifacts;
/// The cascading-fallback metadata fetcher.
pub mod fetch;
/// The pipeline orchestrator and its builder.
pub mod pipeline;

pub use fetch::fetch_inventory;
pub use pipeline::{Pipeline, PipelineBuilder};

pub use quakerun_core::{
    DataSource, EventInfo, FetchResult, Inventory, QuakeError, QuerySpec, RunConfig, RunOutput,
};
