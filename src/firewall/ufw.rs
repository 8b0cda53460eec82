use super::duplicate::is_duplicate;
use super::rule::RuleSpec;
use super::status::StatusProvider;
use super::{FirewallError, FirewallResult};
use crate::executor::{CommandExecutor, ExecutorError};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Thin façade over the `ufw` binary. Every call goes through the executor,
/// which takes care of privilege elevation.
pub struct UfwManager<'a> {
    executor: &'a mut (dyn CommandExecutor + Send),
    program: String,
}

/// Result of an add request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
}

/// What happened during a one-step initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub ssh_port: u16,
    /// Non-fatal step failures, in execution order.
    pub warnings: Vec<String>,
}

/// Outcome of replaying a list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    /// `(command line, failure reason)` per rule that did not apply.
    pub failures: Vec<(String, String)>,
}

impl<'a> UfwManager<'a> {
    pub fn new(executor: &'a mut (dyn CommandExecutor + Send), program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }

    /// Run `ufw <args>` and return its stdout. Non-zero exit becomes `FirewallError::Command`.
    async fn run<S: AsRef<str>>(&mut self, args: &[S]) -> FirewallResult<String> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(args.iter().map(|a| a.as_ref().to_string()));

        debug!("Running command: {}", argv.join(" "));
        let result = self.executor.execute_command(&argv).await?;
        debug!(
            "'{}' exited {} after {:?}",
            result.command,
            result.output.exit_code,
            result.duration()
        );
        if !result.is_success() {
            let stderr = result.output.stderr_lossy();
            return Err(FirewallError::Command {
                command: argv.join(" "),
                stderr: if stderr.is_empty() {
                    format!("exit code {}", result.output.exit_code)
                } else {
                    stderr
                },
            });
        }
        Ok(result.output.to_stdout_string()?)
    }

    /// Reset to a deny-incoming baseline that keeps the SSH port reachable.
    pub async fn initialize(&mut self, ssh_port: u16) -> FirewallResult<InitReport> {
        info!("Resetting ufw");
        self.run(&["--force", "reset"]).await?;

        let ssh_rule = format!("{}/tcp", ssh_port);
        let steps: [&[&str]; 3] = [
            &["default", "deny", "incoming"],
            &["default", "allow", "outgoing"],
            &["allow", ssh_rule.as_str()],
        ];

        let mut warnings = Vec::new();
        for step in steps {
            match self.run(step).await {
                Ok(_) => info!("ufw {}", step.join(" ")),
                Err(FirewallError::Command { command, stderr }) => {
                    warn!("'{}' failed: {}", command, stderr);
                    warnings.push(format!("'{}' failed: {}", command, stderr));
                }
                Err(e) => return Err(e),
            }
        }

        self.enable().await?;
        info!("ufw initialized, SSH port {} allowed", ssh_port);
        Ok(InitReport { ssh_port, warnings })
    }

    pub async fn enable(&mut self) -> FirewallResult<()> {
        self.run(&["--force", "enable"]).await?;
        info!("ufw enabled");
        Ok(())
    }

    pub async fn disable(&mut self) -> FirewallResult<()> {
        self.run(&["disable"]).await?;
        info!("ufw disabled");
        Ok(())
    }

    pub async fn reload(&mut self) -> FirewallResult<()> {
        self.run(&["reload"]).await?;
        info!("ufw reloaded");
        Ok(())
    }

    /// Add a rule unless an identical one is already listed.
    pub async fn add_rule(&mut self, spec: &RuleSpec) -> FirewallResult<AddOutcome> {
        let existing = match self.rule_records().await {
            Ok(records) => records,
            Err(FirewallError::Executor(e)) => return Err(e.into()),
            Err(e) => {
                warn!("Could not read current rules, skipping duplicate check: {}", e);
                Vec::new()
            }
        };

        if is_duplicate(&existing, spec) {
            info!("Rule already present: {}", spec.canonical());
            return Ok(AddOutcome::Duplicate);
        }

        self.run(spec.to_args().as_slice()).await?;
        info!("Rule added: {}", spec.preview(&self.program));
        Ok(AddOutcome::Added)
    }

    /// Delete by index. The index must come from a listing taken just before.
    pub async fn delete_rule(&mut self, index: u32) -> FirewallResult<()> {
        self.run(&["--force".to_string(), "delete".to_string(), index.to_string()])
            .await?;
        info!("Rule {} deleted", index);
        Ok(())
    }

    /// Apply rules one by one. Tool failures are collected and the loop goes on;
    /// elevation failures and cancellation stop it.
    pub async fn replay(&mut self, rules: &[RuleSpec]) -> FirewallResult<ReplayReport> {
        let mut report = ReplayReport::default();
        for spec in rules {
            let line = spec.preview(&self.program);
            match self.run(spec.to_args().as_slice()).await {
                Ok(_) => {
                    info!("Imported rule: {}", line);
                    report.applied += 1;
                }
                Err(FirewallError::Executor(e @ (ExecutorError::Elevation(_) | ExecutorError::Cancelled))) => {
                    return Err(e.into());
                }
                Err(e) => {
                    warn!("Failed to import rule '{}': {}", line, e);
                    report.failures.push((line, e.to_string()));
                }
            }
        }
        Ok(report)
    }
}

#[async_trait]
impl StatusProvider for UfwManager<'_> {
    async fn verbose_status(&mut self) -> FirewallResult<String> {
        self.run(&["status", "verbose"]).await
    }

    async fn numbered_status(&mut self) -> FirewallResult<String> {
        self.run(&["status", "numbered"]).await
    }
}
