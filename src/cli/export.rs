use super::actions;
use super::error::CliError;
use super::parser::Cli;
use super::session::LocalSession;
use clap::Args;

#[derive(Args, Debug)]
pub struct Export {}

impl Export {
    pub async fn run(&self, cli: &Cli) -> Result<(), CliError> {
        let mut session = LocalSession::local(cli.app_config());
        let path = actions::export_snapshot(&mut session).await?;
        println!("{}", path.display());
        Ok(())
    }
}
