use async_trait::async_trait;

use super::{CommandResult, ExecutorError};

/// A trait for executing argument vectors in a uniform way (direct, elevated, scripted).
#[async_trait]
pub trait CommandExecutor: Send {
    /// Execute `argv` feeding `input` to the process' standard input when given.
    async fn execute_with_input(
        &mut self,
        argv: &[String],
        input: Option<&str>,
    ) -> Result<CommandResult, ExecutorError>;

    /// Execute `argv` and return a `CommandResult` containing stdout/stderr/exit code.
    async fn execute_command(&mut self, argv: &[String]) -> Result<CommandResult, ExecutorError> {
        self.execute_with_input(argv, None).await
    }
}

/// Source of the operator's elevation secret. Kept apart from the executor so
/// the retry policy can be exercised without a terminal.
pub trait SecretPrompt {
    /// Returns `Ok(None)` when the operator cancels the prompt.
    fn prompt_secret(&self, message: &str) -> Result<Option<Secret>, ExecutorError>;
}

/// Operator secret. Never printed, not even through `Debug`.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Builds an owned argument vector from string slices.
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts.into_iter().map(|p| p.as_ref().to_string()).collect()
}
