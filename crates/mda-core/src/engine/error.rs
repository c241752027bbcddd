use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::writers::OutputError;
use crate::core::models::domain::SequenceError;
use crate::core::models::protein::MergeError;
use crate::core::models::segment::ParseError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Malformed domain record: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    AlreadyMerged(#[from] MergeError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error(
        "Output file '{path}' already exists and write mode is 'none'",
        path = path.display()
    )]
    OutputConflict { path: PathBuf },

    #[error("Failed to chop domain sequence: {0}")]
    Sequence(#[from] SequenceError),

    #[error("Row source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub fn source_error(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        EngineError::Source(Box::new(e))
    }
}

impl From<OutputError> for EngineError {
    fn from(e: OutputError) -> Self {
        match e {
            OutputError::Conflict { path } => EngineError::OutputConflict { path },
            OutputError::Io { path, source } => EngineError::Io { path, source },
        }
    }
}
