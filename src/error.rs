use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions for a run. None of these are retried; any of them means no
/// artifact is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing data source: set {0}")]
    Configuration(String),
    #[error("fetch failed: {status} {reason}")]
    Fetch { status: u16, reason: String },
    #[error("fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("source document is not usable: {0}")]
    Decode(String),
    #[error("input has no usable rows: {0}")]
    EmptyInput(String),
    #[error("no valid rows found in source ({rows} rows had no city/state)")]
    NoValidRecords { rows: usize },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
