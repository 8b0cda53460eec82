use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Snapshot contains no rules")]
    NoRules,

    #[error("Snapshot file not found: {0}")]
    NotFound(PathBuf),

    #[error("No snapshot files in {0}")]
    NoSnapshots(PathBuf),
}

impl SnapshotError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
