pub mod error;
pub mod local_executor;
#[cfg(test)]
pub(crate) mod scripted;
pub mod sudo_executor;
pub mod traits;
pub mod types;

pub use error::ExecutorError;
pub use local_executor::LocalCommandExecutor;
pub use sudo_executor::{ElevationMode, PrivilegedExecutor, SudoExecutor};
pub use traits::{argv, CommandExecutor, Secret, SecretPrompt};
pub use types::{CommandOutput, CommandResult, OutputError};
