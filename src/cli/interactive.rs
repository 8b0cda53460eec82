use super::actions;
use super::error::CliError;
use super::menu::{MenuAction, Screen, Transition};
use super::parser::{Cli, VERSION_INFO};
use super::session::{LocalSession, Session};
use super::ui;
use crate::executor::PrivilegedExecutor;
use anyhow::Context;
use clap::Args;
use tracing::{error, info};

#[derive(Args, Debug, Default)]
pub struct Menu {}

impl Menu {
    pub async fn run(&self, cli: &Cli) -> Result<(), CliError> {
        let config = cli.app_config();
        config
            .ensure_directories()
            .context("Cannot create data directories")?;

        println!(
            "{} {}",
            ui::format_header("UFW Manager"),
            ui::format_highlight(VERSION_INFO)
        );
        info!("Interactive session started");

        let mut session = LocalSession::local(config);
        session.acquire().await?;
        run_loop(&mut session, &mut TerminalMenu).await?;

        info!("Interactive session finished");
        Ok(())
    }
}

/// Where the loop gets the operator's choice for a screen.
pub trait MenuPrompt {
    /// Index of the chosen entry, `None` on Escape.
    fn choose(&mut self, screen: Screen) -> Result<Option<usize>, CliError>;
}

struct TerminalMenu;

impl MenuPrompt for TerminalMenu {
    fn choose(&mut self, screen: Screen) -> Result<Option<usize>, CliError> {
        ui::print_header(screen.title());
        ui::select("Choose an option", &screen.labels())
    }
}

/// Drive the screens until the operator exits. Action failures are reported
/// and the loop goes on; a failing menu prompt ends it with that error.
pub async fn run_loop<E, M>(session: &mut Session<E>, menu: &mut M) -> Result<(), CliError>
where
    E: PrivilegedExecutor,
    M: MenuPrompt,
{
    let mut screen = Screen::Main;
    loop {
        let transition = match menu.choose(screen) {
            Ok(Some(index)) => screen.select(index).unwrap_or_else(|| screen.on_cancel()),
            Ok(None) | Err(CliError::Cancelled) => screen.on_cancel(),
            Err(e) => return Err(e),
        };

        match transition {
            Transition::Run { action, then } => {
                report(perform(session, action).await);
                screen = then;
            }
            Transition::Goto(next) => screen = next,
            Transition::Exit => {
                println!("Bye.");
                return Ok(());
            }
        }
    }
}

async fn perform<E: PrivilegedExecutor>(
    session: &mut Session<E>,
    action: MenuAction,
) -> Result<(), CliError> {
    match action {
        MenuAction::Initialize => actions::initialize(session).await,
        MenuAction::AddRule => actions::add_rule(session).await,
        MenuAction::DeleteRule => actions::delete_rule(session).await,
        MenuAction::ShowStatus => actions::show_status(session).await,
        MenuAction::Enable => actions::enable(session).await,
        MenuAction::Disable => actions::disable(session).await,
        MenuAction::Reload => actions::reload(session).await,
        MenuAction::ExportRules => actions::export_snapshot(session).await.map(|_| ()),
        MenuAction::ImportRules => {
            let file = actions::choose_snapshot(session).await?;
            actions::import_snapshot(session, &file, false).await
        }
        MenuAction::OrganizeRules => {
            let file = actions::choose_snapshot(session).await?;
            actions::organize_snapshot(session, &file).await.map(|_| ())
        }
    }
}

// Failures end the action, never the session.
fn report(result: Result<(), CliError>) {
    match result {
        Ok(()) => {}
        Err(CliError::Cancelled) => ui::print_warning("Operation cancelled."),
        Err(e) => {
            error!("{}", e);
            ui::print_error(&format!("Error: {}", e));
        }
    }
}
