//! Scripted executor for unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;

use super::{CommandExecutor, CommandResult, ElevationMode, ExecutorError, PrivilegedExecutor};

#[derive(Default)]
pub(crate) struct ScriptedExecutor {
    responses: VecDeque<Result<CommandResult, ExecutorError>>,
    pub calls: Vec<(Vec<String>, Option<String>)>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.responses
            .push_back(Ok(CommandResult::finished("", exit_code, stdout, stderr)));
        self
    }

    pub fn fail(mut self, error: ExecutorError) -> Self {
        self.responses.push_back(Err(error));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.iter().map(|(argv, _)| argv.join(" ")).collect()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute_with_input(
        &mut self,
        argv: &[String],
        input: Option<&str>,
    ) -> Result<CommandResult, ExecutorError> {
        self.calls
            .push((argv.to_vec(), input.map(|s| s.to_string())));
        // Unscripted calls succeed silently.
        let mut result = self
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(CommandResult::finished("", 0, "", "")))?;
        result.command = argv.join(" ");
        Ok(result)
    }
}

#[async_trait]
impl PrivilegedExecutor for ScriptedExecutor {
    async fn acquire(&mut self) -> Result<ElevationMode, ExecutorError> {
        Ok(ElevationMode::Direct)
    }

    async fn refresh(&mut self) -> Result<(), ExecutorError> {
        Ok(())
    }
}
