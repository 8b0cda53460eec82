use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::error::ExecutorError;
use super::traits::{argv, CommandExecutor, Secret, SecretPrompt};
use super::types::CommandResult;

/// How privileged commands reach the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationMode {
    /// Already running as root, commands run unwrapped.
    Direct,
    /// Commands are wrapped in `sudo`.
    Sudo,
}

/// Wraps another executor and runs every command with administrative privileges.
///
/// Each command is first attempted with `sudo -n` so a cached credential is used
/// silently. When sudo reports that a password is needed the operator is asked
/// once, and the command is retried with `sudo -S` reading the secret from
/// standard input. A second credential failure is final.
pub struct SudoExecutor<E, P> {
    inner: E,
    prompt: P,
    sudo_program: String,
    mode: ElevationMode,
}

const PASSWORD_PROMPT: &str = "Password for sudo";

impl<E, P> SudoExecutor<E, P>
where
    E: CommandExecutor,
    P: SecretPrompt + Send,
{
    pub fn new(inner: E, prompt: P, sudo_program: impl Into<String>) -> Self {
        Self {
            inner,
            prompt,
            sudo_program: sudo_program.into(),
            mode: ElevationMode::Sudo,
        }
    }

    /// Establish privileges for the session. Fails if the operator cannot authenticate.
    pub async fn acquire(&mut self) -> Result<ElevationMode, ExecutorError> {
        if self.running_as_root().await {
            info!("Running as root, sudo is not needed");
            self.mode = ElevationMode::Direct;
            return Ok(self.mode);
        }

        self.mode = ElevationMode::Sudo;
        let probe = self
            .inner
            .execute_command(&self.wrap_cached(&argv(["true"])))
            .await?;
        if probe.is_success() {
            info!("sudo privileges already available");
            return Ok(self.mode);
        }

        info!("Administrator privileges are required to manage ufw");
        let verify = self.run_with_secret(&argv(["true"]), None).await?;
        if verify.is_success() {
            info!("sudo credentials verified");
            Ok(self.mode)
        } else {
            Err(ExecutorError::Elevation(
                "incorrect password or insufficient privileges".to_string(),
            ))
        }
    }

    /// Extend the cached sudo credential, asking again if it already expired.
    pub async fn refresh(&mut self) -> Result<(), ExecutorError> {
        if self.mode == ElevationMode::Direct {
            return Ok(());
        }

        let cached = self
            .inner
            .execute_command(&self.wrap_cached(&argv(["-v"])))
            .await?;
        if cached.is_success() {
            debug!("sudo session refreshed");
            return Ok(());
        }

        info!("sudo session expired, re-authentication required");
        let renewed = self.run_with_secret(&argv(["-v"]), None).await?;
        if renewed.is_success() {
            debug!("sudo session refreshed");
            Ok(())
        } else {
            warn!("sudo session refresh failed");
            Err(ExecutorError::Elevation(
                "sudo session refresh failed".to_string(),
            ))
        }
    }

    async fn running_as_root(&mut self) -> bool {
        match self.inner.execute_command(&argv(["id", "-u"])).await {
            Ok(result) if result.is_success() => result
                .output
                .to_stdout_string()
                .map(|uid| uid.trim() == "0")
                .unwrap_or(false),
            Ok(_) => false,
            Err(e) => {
                debug!("Could not determine effective user id: {}", e);
                false
            }
        }
    }

    fn wrap_cached(&self, command: &[String]) -> Vec<String> {
        let mut wrapped = argv([self.sudo_program.as_str(), "-n"]);
        wrapped.extend_from_slice(command);
        wrapped
    }

    fn wrap_with_stdin(&self, command: &[String]) -> Vec<String> {
        // Empty prompt keeps sudo's own prompt text out of stderr.
        let mut wrapped = argv([self.sudo_program.as_str(), "-S", "-p", ""]);
        wrapped.extend_from_slice(command);
        wrapped
    }

    fn ask_secret(&self) -> Result<Secret, ExecutorError> {
        self.prompt
            .prompt_secret(PASSWORD_PROMPT)?
            .ok_or(ExecutorError::Cancelled)
    }

    async fn run_with_secret(
        &mut self,
        command: &[String],
        input: Option<&str>,
    ) -> Result<CommandResult, ExecutorError> {
        let secret = self.ask_secret()?;
        let mut feed = format!("{}\n", secret.expose());
        if let Some(extra) = input {
            feed.push_str(extra);
        }
        let wrapped = self.wrap_with_stdin(command);
        self.inner.execute_with_input(&wrapped, Some(&feed)).await
    }
}

fn needs_credential(result: &CommandResult) -> bool {
    result.output.stderr_lossy().to_lowercase().contains("password")
}

#[async_trait]
impl<E, P> CommandExecutor for SudoExecutor<E, P>
where
    E: CommandExecutor,
    P: SecretPrompt + Send,
{
    async fn execute_with_input(
        &mut self,
        command: &[String],
        input: Option<&str>,
    ) -> Result<CommandResult, ExecutorError> {
        if command.is_empty() {
            return Err(ExecutorError::EmptyCommand);
        }

        if self.mode == ElevationMode::Direct {
            return self.inner.execute_with_input(command, input).await;
        }

        let first = self
            .inner
            .execute_with_input(&self.wrap_cached(command), input)
            .await?;
        if first.is_success() || !needs_credential(&first) {
            return Ok(first);
        }

        info!("sudo needs a password to run '{}'", command.join(" "));
        let retry = self.run_with_secret(command, input).await?;
        if !retry.is_success() && needs_credential(&retry) {
            return Err(ExecutorError::Elevation(format!(
                "incorrect password or insufficient privileges for '{}'",
                command.join(" ")
            )));
        }

        Ok(retry)
    }
}

/// An executor that must establish administrative rights before use.
#[async_trait]
pub trait PrivilegedExecutor: CommandExecutor {
    /// Establish privileges for the session.
    async fn acquire(&mut self) -> Result<ElevationMode, ExecutorError>;

    /// Keep previously acquired privileges alive.
    async fn refresh(&mut self) -> Result<(), ExecutorError>;
}

#[async_trait]
impl<E, P> PrivilegedExecutor for SudoExecutor<E, P>
where
    E: CommandExecutor,
    P: SecretPrompt + Send,
{
    async fn acquire(&mut self) -> Result<ElevationMode, ExecutorError> {
        SudoExecutor::acquire(self).await
    }

    async fn refresh(&mut self) -> Result<(), ExecutorError> {
        SudoExecutor::refresh(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::scripted::ScriptedExecutor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CountingPrompt {
        asked: Arc<AtomicUsize>,
        cancel: bool,
    }

    impl SecretPrompt for CountingPrompt {
        fn prompt_secret(&self, _message: &str) -> Result<Option<Secret>, ExecutorError> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            if self.cancel {
                Ok(None)
            } else {
                Ok(Some(Secret::new("hunter2")))
            }
        }
    }

    const NEEDS_PASSWORD: &str = "sudo: a password is required";

    #[tokio::test]
    async fn cached_credential_runs_without_prompt() {
        let inner = ScriptedExecutor::new().respond(0, "Status: active\n", "");
        let prompt = CountingPrompt::default();
        let mut sudo = SudoExecutor::new(inner, prompt.clone(), "sudo");

        let result = sudo
            .execute_command(&argv(["ufw", "status"]))
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 0);
        assert_eq!(sudo.inner.calls[0].0, argv(["sudo", "-n", "ufw", "status"]));
    }

    #[tokio::test]
    async fn password_prompt_then_retry_with_stdin() {
        let inner = ScriptedExecutor::new()
            .respond(1, "", NEEDS_PASSWORD)
            .respond(0, "Firewall reloaded\n", "");
        let prompt = CountingPrompt::default();
        let mut sudo = SudoExecutor::new(inner, prompt.clone(), "sudo");

        let result = sudo.execute_command(&argv(["ufw", "reload"])).await.unwrap();

        assert!(result.is_success());
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 1);
        let (retry_argv, retry_input) = &sudo.inner.calls[1];
        assert_eq!(retry_argv, &argv(["sudo", "-S", "-p", "", "ufw", "reload"]));
        assert_eq!(retry_input.as_deref(), Some("hunter2\n"));
    }

    #[tokio::test]
    async fn second_credential_failure_is_final() {
        let inner = ScriptedExecutor::new()
            .respond(1, "", NEEDS_PASSWORD)
            .respond(1, "", "sudo: 1 incorrect password attempt");
        let prompt = CountingPrompt::default();
        let mut sudo = SudoExecutor::new(inner, prompt.clone(), "sudo");

        let err = sudo
            .execute_command(&argv(["ufw", "reload"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutorError::Elevation(_)));
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 1);
        assert_eq!(sudo.inner.calls.len(), 2);
    }

    #[tokio::test]
    async fn tool_failure_is_returned_not_retried() {
        let inner = ScriptedExecutor::new().respond(1, "", "ERROR: Bad port");
        let prompt = CountingPrompt::default();
        let mut sudo = SudoExecutor::new(inner, prompt.clone(), "sudo");

        let result = sudo
            .execute_command(&argv(["ufw", "allow", "99999"]))
            .await
            .unwrap();

        assert!(!result.is_success());
        assert_eq!(result.output.stderr_lossy(), "ERROR: Bad port");
        assert_eq!(prompt.asked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancelled_prompt_aborts_command() {
        let inner = ScriptedExecutor::new().respond(1, "", NEEDS_PASSWORD);
        let prompt = CountingPrompt {
            cancel: true,
            ..Default::default()
        };
        let mut sudo = SudoExecutor::new(inner, prompt, "sudo");

        let err = sudo
            .execute_command(&argv(["ufw", "reload"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::Cancelled));
    }

    #[tokio::test]
    async fn acquire_as_root_switches_to_direct_mode() {
        let inner = ScriptedExecutor::new()
            .respond(0, "0\n", "")
            .respond(0, "Status: inactive\n", "");
        let mut sudo = SudoExecutor::new(inner, CountingPrompt::default(), "sudo");

        assert_eq!(sudo.acquire().await.unwrap(), ElevationMode::Direct);
        sudo.execute_command(&argv(["ufw", "status"])).await.unwrap();
        assert_eq!(sudo.inner.calls[1].0, argv(["ufw", "status"]));
    }

    #[tokio::test]
    async fn acquire_rejects_wrong_password() {
        let inner = ScriptedExecutor::new()
            .respond(0, "1000\n", "")
            .respond(1, "", NEEDS_PASSWORD)
            .respond(1, "", "Sorry, try again.");
        let mut sudo = SudoExecutor::new(inner, CountingPrompt::default(), "sudo");

        let err = sudo.acquire().await.unwrap_err();
        assert!(matches!(err, ExecutorError::Elevation(_)));
    }

    #[test]
    fn secret_is_never_debug_printed() {
        let secret = Secret::new("hunter2");
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }
}
