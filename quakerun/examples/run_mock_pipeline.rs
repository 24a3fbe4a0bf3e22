use std::sync::Arc;

use chrono::{TimeZone, Utc};
use quakerun::Pipeline;
use quakerun_core::{DataSource, EventInfo, RunConfig};
use quakerun_mock::{MockCatalog, MockEngine, MockPostProcessor, MockRetriever, fixtures};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Build the pipeline against the deterministic mocks. The catalog
    //    denies its broad query so the run exercises the fetch cascade.
    let catalog = MockCatalog::builder(fixtures::two_network_world())
        .deny_global()
        .deny_network("IU")
        .build();
    let pipeline = Pipeline::builder()
        .with_catalog(Arc::new(catalog))
        .retriever(Arc::new(MockRetriever::default()))
        .engine(Arc::new(MockEngine::ok()))
        .post_processor(Arc::new(MockPostProcessor::ok()))
        .build()?;

    // 2. Describe the event and the run.
    let event = EventInfo {
        latitude: -3.3,
        longitude: 152.2,
        depth_km: 35.0,
        origin_time: Utc.with_ymd_and_hms(2015, 3, 29, 23, 48, 31).unwrap(),
        magnitude: Some(7.5),
    };
    let dir = std::env::temp_dir().join("quakerun-example-run");
    let cfg = RunConfig::builder(&dir)
        .with_source(DataSource::new("mock://catalog"))
        .event(event)
        .networks(&["II", "IU"])
        .output_dir_can_exist(true)
        .build();

    // 3. Run and print the structured result.
    let output = pipeline.run(cfg).await?;
    println!("warnings: {:?}", output.warnings);
    println!("{}", serde_json::to_string_pretty(&output)?);
    println!("artifacts in {}", dir.display());

    Ok(())
}
