//! Artifacts persisted to a run's working directory.
//!
//! All serialized artifacts are JSON; the failure log is plain text with one
//! human-readable failure per line.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use quakerun_core::{FailureRecord, Inventory, QuakeError, RunOutput, RunState};

/// Failure-log file: one [`FailureRecord`] per line. Written only when the
/// acquisition stage recorded any failure.
pub const FAILURE_LOG_FILE: &str = "inventory_failures.txt";
/// Merged-inventory artifact.
pub const INVENTORY_FILE: &str = "inventory.json";
/// Checkpoint written after data retrieval, before the computational stage.
pub const CHECKPOINT_FILE: &str = "checkpoint.json";
/// Final run output, written when the run directory exists.
pub const RUN_OUTPUT_FILE: &str = "run_output.json";

/// Write the failure log, one record per line.
pub fn write_failure_log<'a, I>(dir: &Path, failures: I) -> Result<(), QuakeError>
where
    I: IntoIterator<Item = &'a FailureRecord>,
{
    let mut out = BufWriter::new(File::create(dir.join(FAILURE_LOG_FILE))?);
    for rec in failures {
        writeln!(out, "{rec}")?;
    }
    out.flush()?;
    Ok(())
}

/// Write the merged inventory.
pub fn write_inventory(dir: &Path, inventory: &Inventory) -> Result<(), QuakeError> {
    let out = BufWriter::new(File::create(dir.join(INVENTORY_FILE))?);
    serde_json::to_writer_pretty(out, inventory)?;
    Ok(())
}

/// Read a previously persisted merged inventory.
pub fn read_inventory(dir: &Path) -> Result<Inventory, QuakeError> {
    let input = BufReader::new(File::open(dir.join(INVENTORY_FILE))?);
    Ok(serde_json::from_reader(input)?)
}

/// Write the retrieval checkpoint.
pub fn write_checkpoint(dir: &Path, state: &RunState) -> Result<(), QuakeError> {
    let out = BufWriter::new(File::create(dir.join(CHECKPOINT_FILE))?);
    serde_json::to_writer(out, state)?;
    Ok(())
}

/// Read the retrieval checkpoint, allowing the computational stage to be
/// retried without re-fetching data.
pub fn read_checkpoint(dir: &Path) -> Result<RunState, QuakeError> {
    let input = BufReader::new(File::open(dir.join(CHECKPOINT_FILE))?);
    Ok(serde_json::from_reader(input)?)
}

/// Write the final run output.
pub fn write_run_output(dir: &Path, output: &RunOutput) -> Result<(), QuakeError> {
    let out = BufWriter::new(File::create(dir.join(RUN_OUTPUT_FILE))?);
    serde_json::to_writer_pretty(out, output)?;
    Ok(())
}
