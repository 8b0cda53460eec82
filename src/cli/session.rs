use super::error::CliError;
use super::ui::TerminalPrompt;
use crate::config::AppConfig;
use crate::executor::{ElevationMode, LocalCommandExecutor, PrivilegedExecutor, SudoExecutor};
use crate::firewall::UfwManager;
use crate::snapshot::SnapshotStore;
use tracing::info;

pub type LocalSession = Session<SudoExecutor<LocalCommandExecutor, TerminalPrompt>>;

/// Everything a menu action needs: configuration, the snapshot directory and
/// the privileged executor shared by all firewall calls.
pub struct Session<E> {
    pub config: AppConfig,
    pub store: SnapshotStore,
    executor: E,
    privileged: bool,
}

impl LocalSession {
    pub fn local(config: AppConfig) -> Self {
        let sudo_program = config.sudo_program.clone();
        Session::new(
            config,
            SudoExecutor::new(LocalCommandExecutor::new(), TerminalPrompt, sudo_program),
        )
    }
}

impl<E: PrivilegedExecutor> Session<E> {
    pub fn new(config: AppConfig, executor: E) -> Self {
        let store = SnapshotStore::new(config.rules_dir.clone());
        Self {
            config,
            store,
            executor,
            privileged: false,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub async fn acquire(&mut self) -> Result<ElevationMode, CliError> {
        let mode = self.executor.acquire().await?;
        self.privileged = true;
        info!("Privileges acquired ({:?})", mode);
        Ok(mode)
    }

    /// Acquire privileges on first use, refresh them afterwards.
    pub async fn elevate(&mut self) -> Result<(), CliError> {
        if self.privileged {
            self.executor.refresh().await?;
        } else {
            self.acquire().await?;
        }
        Ok(())
    }

    /// Firewall handle with fresh privileges.
    pub async fn firewall(&mut self) -> Result<UfwManager<'_>, CliError> {
        self.elevate().await?;
        Ok(UfwManager::new(
            &mut self.executor,
            self.config.ufw_program.clone(),
        ))
    }
}
