use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ExecutorError {
    #[error("Local command error: {0}")]
    LocalError(String),

    #[error("No command provided")]
    EmptyCommand,

    #[error("Privilege elevation failed: {0}")]
    Elevation(String),

    #[error("Cancelled by operator")]
    Cancelled,
}
