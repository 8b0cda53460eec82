#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use ufw_manager::cli::session::Session;
use ufw_manager::config::AppConfig;
use ufw_manager::executor::{
    CommandExecutor, CommandResult, ElevationMode, ExecutorError, PrivilegedExecutor,
};

pub const STATUS_VERBOSE: &str = include_str!("../fixtures/status_verbose.txt");
pub const STATUS_NUMBERED: &str = include_str!("../fixtures/status_numbered.txt");
pub const SNAPSHOT_MESSY: &str = include_str!("../fixtures/snapshot_messy.yaml");

/// Stands in for a privileged `ufw`: answers status queries from fixtures,
/// succeeds on everything else and records every argument vector.
#[derive(Default)]
pub struct FakeUfw {
    pub numbered: String,
    pub verbose: String,
    /// Commands containing this text exit 1 with an error message.
    pub failing: Option<String>,
    pub calls: Vec<Vec<String>>,
    pub acquired: usize,
}

impl FakeUfw {
    pub fn with_fixtures() -> Self {
        Self {
            numbered: STATUS_NUMBERED.to_string(),
            verbose: STATUS_VERBOSE.to_string(),
            ..Default::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.iter().map(|argv| argv.join(" ")).collect()
    }
}

#[async_trait]
impl CommandExecutor for FakeUfw {
    async fn execute_with_input(
        &mut self,
        argv: &[String],
        _input: Option<&str>,
    ) -> Result<CommandResult, ExecutorError> {
        self.calls.push(argv.to_vec());
        let line = argv.join(" ");

        if let Some(failing) = &self.failing {
            if line.contains(failing.as_str()) {
                return Ok(CommandResult::finished(&line, 1, "", "ERROR: Bad port"));
            }
        }

        let stdout = match argv.get(1..) {
            Some([a, b]) if a == "status" && b == "numbered" => self.numbered.as_str(),
            Some([a, b]) if a == "status" && b == "verbose" => self.verbose.as_str(),
            _ => "",
        };
        Ok(CommandResult::finished(&line, 0, stdout, ""))
    }
}

#[async_trait]
impl PrivilegedExecutor for FakeUfw {
    async fn acquire(&mut self) -> Result<ElevationMode, ExecutorError> {
        self.acquired += 1;
        Ok(ElevationMode::Direct)
    }

    async fn refresh(&mut self) -> Result<(), ExecutorError> {
        Ok(())
    }
}

pub fn config_in(dir: &Path) -> AppConfig {
    AppConfig {
        rules_dir: dir.join("rules"),
        log_dir: dir.join("logs"),
        ..AppConfig::default()
    }
}

pub fn session_in(dir: &Path, ufw: FakeUfw) -> Session<FakeUfw> {
    Session::new(config_in(dir), ufw)
}
