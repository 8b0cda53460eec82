use super::actions;
use super::error::CliError;
use super::parser::Cli;
use super::session::LocalSession;
use clap::Args;

#[derive(Args, Debug)]
pub struct Status {}

impl Status {
    pub async fn run(&self, cli: &Cli) -> Result<(), CliError> {
        let mut session = LocalSession::local(cli.app_config());
        actions::show_status(&mut session).await
    }
}
