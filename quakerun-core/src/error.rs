use thiserror::Error;

/// Unified error type for the quakerun workspace.
///
/// This covers configuration validation, catalog query failures, total
/// acquisition failure, the recoverable computation warning, and opaque
/// collaborator/runtime failures.
#[derive(Debug, Error)]
pub enum QuakeError {
    /// The run configuration is invalid. Raised before any I/O happens.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A single catalog query failed. Inside the fetch cascade this is
    /// degraded to a `FailureRecord`; it never aborts the cascade's loops.
    #[error("catalog query against {source_name} failed: {msg}")]
    Catalog {
        /// Catalog source name or URL that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// No usable metadata was produced by any configured source.
    #[error("no metadata available for event: {event}")]
    NoMetadata {
        /// Description of the event the acquisition was scoped to.
        event: String,
    },

    /// The computational stage produced a degraded but usable result.
    /// Appended to the run output's warning list rather than treated as fatal.
    #[error("computation warning: {0}")]
    ComputeWarning(String),

    /// Issues with returned or expected data (missing fields, shape
    /// mismatches between collaborator outputs, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// A collaborator stage failed with an opaque error.
    #[error("{stage} failed: {msg}")]
    Collaborator {
        /// Pipeline stage name (e.g. "retrieve", "compute", "post-process").
        stage: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Filesystem failure while managing the working directory.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact serialization failure.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl QuakeError {
    /// Helper: build an `InvalidConfig` error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Helper: build a `Catalog` error tagged with the source that failed.
    pub fn catalog(source: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Catalog {
            source_name: source.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Collaborator` error for a named pipeline stage.
    pub fn collaborator(stage: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Collaborator {
            stage: stage.into(),
            msg: msg.into(),
        }
    }
}

/// Render an error and its full `source()` chain, one cause per line.
///
/// This is the diagnostic trace stored under the run output's reserved
/// stacktrace key when a stage fails after acquisition.
#[must_use]
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(c) = cause {
        out.push_str("\ncaused by: ");
        out.push_str(&c.to_string());
        cause = c.source();
    }
    out
}
