// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the analysis of a sample (or of the whole run).
#[derive(Debug, Error)]
pub enum ContaminationError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("no genus found in primary data for {sample}; check READ_COUNTS.txt")]
    NoPrimaryGenus { sample: String },

    #[error("multiple influenza genera found in primary data for {sample}: {}", .genera.join(" and "))]
    MultiplePrimaryGenera { sample: String, genera: Vec<String> },

    #[error("no primary {segment} segment found for {sample}; cannot derive subtype")]
    MissingPrimarySegment { sample: String, segment: String },

    #[error("could not build thread pool: {0}")]
    ThreadPool(String),
}

impl ContaminationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContaminationError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ContaminationError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContaminationError>;
