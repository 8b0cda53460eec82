use crate::executor::ExecutorError;
use crate::firewall::{FirewallError, RuleError};
use crate::snapshot::SnapshotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Privilege elevation failed: {0}")]
    Elevation(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Firewall(FirewallError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl From<ExecutorError> for CliError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Cancelled => CliError::Cancelled,
            ExecutorError::Elevation(msg) => CliError::Elevation(msg),
            other => CliError::OperationFailed(other.to_string()),
        }
    }
}

impl From<FirewallError> for CliError {
    fn from(err: FirewallError) -> Self {
        match err {
            FirewallError::Executor(e) => e.into(),
            FirewallError::Validation(e) => e.into(),
            other => CliError::Firewall(other),
        }
    }
}

impl From<RuleError> for CliError {
    fn from(err: RuleError) -> Self {
        CliError::Validation(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                CliError::Cancelled
            }
            other => CliError::OperationFailed(format!("Terminal error: {}", other)),
        }
    }
}
