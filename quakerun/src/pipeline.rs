use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use serde_json::json;

use quakerun_core::{
    CatalogClient, ComputeEngine, DataRetriever, EventInfo, FetchResult, PickTimes, PostProcessor,
    QuakeError, QuerySpec, RunConfig, RunOutput, RunState, WaveformCollection, error_chain,
    merge_all,
};

use crate::artifacts;
use crate::fetch::fetch_inventory;

/// Existence-window padding applied around the origin time when building the
/// broad metadata query. Only filters station existence, so rough is fine.
const T_AROUND_ORIGIN: i64 = 3600;

/// Orchestrator that sequences one pipeline run over the registered
/// catalog clients and collaborators.
pub struct Pipeline {
    catalogs: Vec<Arc<dyn CatalogClient>>,
    retriever: Arc<dyn DataRetriever>,
    engine: Arc<dyn ComputeEngine>,
    post: Arc<dyn PostProcessor>,
}

/// Builder for constructing a [`Pipeline`] with its collaborators.
#[derive(Default)]
pub struct PipelineBuilder {
    catalogs: Vec<Arc<dyn CatalogClient>>,
    retriever: Option<Arc<dyn DataRetriever>>,
    engine: Option<Arc<dyn ComputeEngine>>,
    post: Option<Arc<dyn PostProcessor>>,
}

impl PipelineBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog client. A run configuration's data sources are
    /// resolved against registered clients by name.
    #[must_use]
    pub fn with_catalog(mut self, client: Arc<dyn CatalogClient>) -> Self {
        self.catalogs.push(client);
        self
    }

    /// Set the waveform-retrieval collaborator. Required.
    #[must_use]
    pub fn retriever(mut self, retriever: Arc<dyn DataRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the computational collaborator. Required.
    #[must_use]
    pub fn engine(mut self, engine: Arc<dyn ComputeEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the post-processing collaborator. Required.
    #[must_use]
    pub fn post_processor(mut self, post: Arc<dyn PostProcessor>) -> Self {
        self.post = Some(post);
        self
    }

    /// Finish building.
    ///
    /// # Errors
    /// Returns `QuakeError::InvalidConfig` when a required collaborator is
    /// missing.
    pub fn build(self) -> Result<Pipeline, QuakeError> {
        Ok(Pipeline {
            catalogs: self.catalogs,
            retriever: self
                .retriever
                .ok_or_else(|| QuakeError::invalid_config("pipeline requires a data retriever"))?,
            engine: self
                .engine
                .ok_or_else(|| QuakeError::invalid_config("pipeline requires a compute engine"))?,
            post: self
                .post
                .ok_or_else(|| QuakeError::invalid_config("pipeline requires a post-processor"))?,
        })
    }
}

impl Pipeline {
    /// Start building a pipeline.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Execute one run: validate the configuration, acquire metadata,
    /// retrieve waveforms, run the inversion, and post-process.
    ///
    /// Failures before any output exists (configuration validation and
    /// metadata acquisition) propagate as `Err`. From data retrieval onward
    /// the run always returns `Ok` with a [`RunOutput`]: a recoverable
    /// computation warning is appended to the warning list, and any other
    /// stage failure is captured under the output's reserved error keys with
    /// its full cause chain.
    ///
    /// # Errors
    /// `QuakeError::InvalidConfig` before any I/O on a malformed
    /// configuration; `QuakeError::NoMetadata` when every source yielded
    /// zero usable metadata; I/O errors from creating the working directory
    /// or persisting acquisition artifacts.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(output_dir = %cfg.output_dir.display()))
    )]
    pub async fn run(&self, cfg: RunConfig) -> Result<RunOutput, QuakeError> {
        // Init: validate everything before touching the filesystem.
        let event = cfg
            .event
            .clone()
            .ok_or_else(|| QuakeError::invalid_config("event description is required"))?;
        if cfg.sources.is_empty() {
            return Err(QuakeError::invalid_config(
                "at least one data source is required",
            ));
        }
        if let Some(inventories) = &cfg.inventories {
            if inventories.len() != cfg.sources.len() {
                return Err(QuakeError::invalid_config(format!(
                    "{} inventories supplied for {} sources",
                    inventories.len(),
                    cfg.sources.len()
                )));
            }
        }
        let clients = self.resolve_clients(&cfg)?;

        if cfg.output_dir.exists() && !cfg.output_dir_can_exist {
            return Err(QuakeError::invalid_config(format!(
                "output directory {} already exists",
                cfg.output_dir.display()
            )));
        }
        std::fs::create_dir_all(&cfg.output_dir)?;

        // AcquireMetadata: per source, either trust the supplied inventory
        // or walk the fetch cascade.
        let fetches = self.acquire_metadata(&cfg, &event, &clients).await?;

        let failures: Vec<_> = fetches.iter().flat_map(|f| &f.failures).collect();
        if !failures.is_empty() {
            artifacts::write_failure_log(&cfg.output_dir, failures)?;
        }
        let merged = merge_all(fetches.iter().map(|f| f.inventory.clone()));
        if merged.is_empty() {
            // No waveform retrieval without metadata; nothing to salvage.
            return Err(QuakeError::NoMetadata {
                event: event.to_string(),
            });
        }
        artifacts::write_inventory(&cfg.output_dir, &merged)?;

        // From here on every condition funnels into the returned output.
        let mut output = RunOutput::new();
        if let Err(err) = self.run_stages(&cfg, &event, &fetches, &mut output).await {
            match err {
                QuakeError::ComputeWarning(msg) => output.add_warning(msg),
                other => {
                    let trace = error_chain(&other);
                    output.set_fatal(other.to_string(), trace);
                }
            }
        }
        if let Err(e) = artifacts::write_run_output(&cfg.output_dir, &output) {
            output.add_warning(format!("failed to persist run output: {e}"));
        }
        Ok(output)
    }

    fn resolve_clients(&self, cfg: &RunConfig) -> Result<Vec<Arc<dyn CatalogClient>>, QuakeError> {
        // Pre-supplied inventories bypass the catalog entirely.
        if cfg.inventories.is_some() {
            return Ok(vec![]);
        }
        cfg.sources
            .iter()
            .map(|src| {
                self.catalogs
                    .iter()
                    .find(|c| c.name() == src.name)
                    .cloned()
                    .ok_or_else(|| {
                        QuakeError::invalid_config(format!(
                            "no catalog client registered for source {}",
                            src.name
                        ))
                    })
            })
            .collect()
    }

    async fn acquire_metadata(
        &self,
        cfg: &RunConfig,
        event: &EventInfo,
        clients: &[Arc<dyn CatalogClient>],
    ) -> Result<Vec<FetchResult>, QuakeError> {
        if let Some(inventories) = &cfg.inventories {
            return Ok(cfg
                .sources
                .iter()
                .zip(inventories.iter().cloned())
                .map(|(src, inventory)| FetchResult {
                    source: src.name.clone(),
                    inventory,
                    failures: vec![],
                })
                .collect());
        }
        let base = QuerySpec::for_event(
            event,
            cfg.dist_range,
            &cfg.networks,
            Duration::seconds(T_AROUND_ORIGIN),
            Duration::seconds(T_AROUND_ORIGIN),
        );
        let mut fetches = Vec::with_capacity(clients.len());
        for client in clients {
            fetches.push(fetch_inventory(client.as_ref(), &base).await?);
        }
        Ok(fetches)
    }

    /// RetrieveData → Compute → PostProcess. Any error returned here is
    /// captured into the run output by `run`; nothing escapes past it.
    async fn run_stages(
        &self,
        cfg: &RunConfig,
        event: &EventInfo,
        fetches: &[FetchResult],
        output: &mut RunOutput,
    ) -> Result<(), QuakeError> {
        // RetrieveData: one retrieval per (source, inventory) pair,
        // concatenated in source order.
        let mut streams = WaveformCollection::new();
        let mut pick_times = PickTimes::new();
        for fetch in fetches {
            let (got, picks) = self
                .retriever
                .retrieve(event, &fetch.inventory, &cfg.acquisition)
                .await?;
            let got = if cfg.acquisition.use_only_vertical {
                got.select_component('Z')
            } else {
                got
            };
            streams.extend(got);
            pick_times.extend(picks);
        }
        let state = RunState {
            pick_times,
            streams,
        };
        artifacts::write_checkpoint(&cfg.output_dir, &state)?;
        let RunState {
            pick_times,
            streams,
        } = state;

        // Compute: opaque blocking call, wall clock recorded even when the
        // engine fails.
        let started = Instant::now();
        let invoked = self
            .engine
            .invoke(&streams, &pick_times, event, &cfg.processing)
            .await;
        output.insert(
            "compute_time_seconds",
            json!(started.elapsed().as_secs_f64()),
        );
        let result = invoked?;
        output.insert("inversion", result.clone());

        // PostProcess enriches the output in place.
        self.post
            .process(&result, output, event, &pick_times, &cfg.output_dir)
            .await?;
        Ok(())
    }
}
