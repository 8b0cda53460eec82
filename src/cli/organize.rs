use super::actions;
use super::error::CliError;
use super::parser::Cli;
use super::session::LocalSession;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct Organize {
    /// Snapshot file, either a path or a file name inside the rules directory
    pub file: PathBuf,
}

impl Organize {
    pub async fn run(&self, cli: &Cli) -> Result<(), CliError> {
        let session = LocalSession::local(cli.app_config());
        actions::organize_snapshot(&session, &self.file).await?;
        Ok(())
    }
}
