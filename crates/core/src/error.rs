use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop an aggregation before it starts.
///
/// Anything that goes wrong once the walk is underway is recorded as a
/// [`SkippedEntry`](crate::model::SkippedEntry) instead.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("could not open {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
}

impl AggregateError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            AggregateError::Path { path, .. } | AggregateError::NotADirectory { path } => path,
        }
    }
}
