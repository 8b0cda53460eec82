pub mod actions;
pub mod error;
mod export;
mod import;
pub mod interactive;
pub mod menu;
mod organize;
pub mod parser;
pub mod session;
mod status;
pub mod ui;

use clap::Parser;
use error::CliError;
use parser::{Cli, Commands};

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Dispatch the parsed command. A cancelled prompt is not a failure.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    ui::trap_interrupts()?;

    let result = match &cli.command {
        None => interactive::Menu::default().run(&cli).await,
        Some(Commands::Menu(cmd)) => cmd.run(&cli).await,
        Some(Commands::Status(cmd)) => cmd.run(&cli).await,
        Some(Commands::Export(cmd)) => cmd.run(&cli).await,
        Some(Commands::Import(cmd)) => cmd.run(&cli).await,
        Some(Commands::Organize(cmd)) => cmd.run(&cli).await,
    };

    match result {
        Err(CliError::Cancelled) => {
            ui::print_warning("Operation cancelled.");
            Ok(())
        }
        other => other,
    }
}
