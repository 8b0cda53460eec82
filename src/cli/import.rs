use super::actions;
use super::error::CliError;
use super::parser::Cli;
use super::session::LocalSession;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct Import {
    /// Snapshot file, either a path or a file name inside the rules directory
    pub file: PathBuf,

    /// Apply without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl Import {
    pub async fn run(&self, cli: &Cli) -> Result<(), CliError> {
        let mut session = LocalSession::local(cli.app_config());
        actions::import_snapshot(&mut session, &self.file, self.yes).await
    }
}
