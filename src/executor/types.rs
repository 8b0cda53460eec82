use std::string::FromUtf8Error;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when processing command output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] FromUtf8Error),

    #[error("Output exceeds maximum size: {size} bytes")]
    OutputTooLarge { size: usize },
}

/// Contains the raw output (stdout/stderr), exit code, timing information, etc.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub duration: Duration,
}

impl Default for CommandOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandOutput {
    const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024; // 10 MB

    pub fn new() -> Self {
        Self {
            stdout: vec![],
            stderr: vec![],
            exit_code: 0,
            duration: Duration::default(),
        }
    }

    /// Convert stdout bytes to UTF-8 string
    pub fn to_stdout_string(&self) -> Result<String, OutputError> {
        if self.stdout.len() > Self::MAX_OUTPUT_SIZE {
            return Err(OutputError::OutputTooLarge {
                size: self.stdout.len(),
            });
        }
        Ok(String::from_utf8(self.stdout.clone())?)
    }

    /// Stderr as text, replacing invalid UTF-8. Used for failure reasons.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Wraps the command that was run plus its resulting output.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command: String,
    pub output: CommandOutput,
}

impl CommandResult {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            output: CommandOutput::new(),
        }
    }

    /// Convenience constructor for a finished command.
    pub fn finished(command: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        let mut result = Self::new(command);
        result.output.exit_code = exit_code;
        result.output.stdout = stdout.as_bytes().to_vec();
        result.output.stderr = stderr.as_bytes().to_vec();
        result
    }

    pub fn is_success(&self) -> bool {
        self.output.exit_code == 0
    }

    /// Duration from command start to completion
    pub fn duration(&self) -> Duration {
        self.output.duration
    }
}
