use super::error::CliError;
use crate::executor::{ExecutorError, Secret, SecretPrompt};
use crate::firewall::RuleRecord;
use colored::*;
use dialoguer::console::Term;
use dialoguer::{Confirm, Input, Password, Select};
use std::fmt::Display;
use std::str::FromStr;
use tabled::{
    settings::{object::Rows, Color, Format, Modify, Style},
    Table, Tabled,
};
use tracing::debug;

pub fn format_header(text: &str) -> String {
    format!("{}", text.blue().bold())
}

pub fn format_highlight(text: &str) -> String {
    format!("{}", text.cyan())
}

pub fn format_success(text: &str) -> String {
    format!("{}", text.green())
}

pub fn format_warning(text: &str) -> String {
    format!("{}", text.yellow())
}

pub fn format_error(text: &str) -> String {
    format!("{}", text.red().bold())
}

pub fn print_header(text: &str) {
    println!("\n{}", format_header(text));
}

pub fn print_success(text: &str) {
    println!("{}", format_success(text));
}

pub fn print_warning(text: &str) {
    println!("{}", format_warning(text));
}

pub fn print_error(text: &str) {
    eprintln!("{}", format_error(text));
}

/// Keep Ctrl-C from terminating the process.
///
/// The terminal backend raises SIGINT when it reads `^C`. With a handler in
/// place the raise returns and the prompt fails with `ErrorKind::Interrupted`,
/// which becomes `CliError::Cancelled`.
#[cfg(unix)]
pub fn trap_interrupts() -> Result<(), CliError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupts = signal(SignalKind::interrupt()).map_err(|e| {
        CliError::ConfigError(format!("Cannot install interrupt handler: {}", e))
    })?;
    tokio::spawn(async move {
        while interrupts.recv().await.is_some() {
            debug!("Interrupt received, cancelling the current prompt");
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn trap_interrupts() -> Result<(), CliError> {
    tokio::spawn(async {
        while tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling the current prompt");
        }
    });
    Ok(())
}

fn is_interrupt(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted)
}

// A prompt that fails mid-render leaves the cursor hidden.
fn restore_cursor<T>(result: dialoguer::Result<T>) -> dialoguer::Result<T> {
    if result.is_err() {
        let _ = Term::stderr().show_cursor();
    }
    result
}

/// Asks for the sudo password on the terminal with echo disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn prompt_secret(&self, message: &str) -> Result<Option<Secret>, ExecutorError> {
        // ^C does not end a line-buffered read, so an empty entry is the way out.
        let entered = Password::new()
            .with_prompt(format!("{} (empty to cancel)", message))
            .allow_empty_password(true)
            .interact();
        match restore_cursor(entered) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(Secret::new(value))),
            Err(e) if is_interrupt(&e) => Ok(None),
            Err(e) => Err(ExecutorError::LocalError(format!(
                "Cannot read password: {}",
                e
            ))),
        }
    }
}

/// Menu selection. `None` when the operator presses Escape.
pub fn select<T: ToString>(prompt: &str, items: &[T]) -> Result<Option<usize>, CliError> {
    Ok(restore_cursor(
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt(),
    )?)
}

/// Yes/no question, yes by default. Escape counts as no.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    let answer = restore_cursor(
        Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact_opt(),
    )?;
    Ok(answer.unwrap_or(false))
}

/// Free text re-asked until it parses as `T`.
pub fn input_parsed<T>(prompt: &str, default: Option<&str>) -> Result<T, CliError>
where
    T: FromStr + 'static,
    T::Err: Display,
{
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    let text = restore_cursor(
        input
            .validate_with(|value: &String| -> Result<(), String> {
                value.trim().parse::<T>().map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text(),
    )?;
    text.trim()
        .parse::<T>()
        .map_err(|e| CliError::Validation(e.to_string()))
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    number: u32,
    #[tabled(rename = "Rule")]
    rule: String,
}

pub fn rule_table(records: &[RuleRecord]) -> String {
    let rows: Vec<_> = records
        .iter()
        .map(|record| RuleRow {
            number: record.index,
            rule: record.content.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(Modify::new(Rows::first()).with(Format::content(|s| s.bold().to_string())));
    table.to_string()
}

pub fn print_rules(records: &[RuleRecord]) {
    if records.is_empty() {
        println!("  {}", format_warning("(No rules)"));
    } else {
        println!("{}", rule_table(records));
    }
}
