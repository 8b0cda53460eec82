use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::error::ExecutorError;
use super::traits::CommandExecutor;
use super::types::{CommandOutput, CommandResult};

/// Runs argument vectors as direct child processes of this program.
pub struct LocalCommandExecutor;

impl Default for LocalCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for LocalCommandExecutor {
    async fn execute_with_input(
        &mut self,
        argv: &[String],
        input: Option<&str>,
    ) -> Result<CommandResult, ExecutorError> {
        let (program, program_args) = argv.split_first().ok_or(ExecutorError::EmptyCommand)?;
        let command = argv.join(" ");

        let start_time = Instant::now();

        let mut child = Command::new(program)
            .args(program_args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutorError::LocalError(format!("{}: {}", program, e)))?;

        if let (Some(data), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin
                .write_all(data.as_bytes())
                .await
                .map_err(|e| ExecutorError::LocalError(e.to_string()))?;
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecutorError::LocalError(e.to_string()))?;

        let mut cmd_output = CommandOutput::new();
        cmd_output.stdout = output.stdout;
        cmd_output.stderr = output.stderr;
        cmd_output.exit_code = output.status.code().unwrap_or(-1);
        cmd_output.duration = start_time.elapsed();

        tracing::debug!(
            "Command '{}' completed with exit code {}",
            command,
            cmd_output.exit_code
        );

        Ok(CommandResult {
            command,
            output: cmd_output,
        })
    }
}
