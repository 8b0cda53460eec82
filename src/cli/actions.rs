//! One function per menu action. Subcommands reuse the non-interactive ones.

use super::error::CliError;
use super::session::Session;
use super::ui;
use crate::executor::PrivilegedExecutor;
use crate::firewall::ssh_port::detect_ssh_port;
use crate::firewall::status::{rule_table, summary};
use crate::firewall::{
    AddOutcome, Action, Direction, PortSpec, Protocol, RuleSpec, Source, StatusProvider,
};
use crate::snapshot::Snapshot;
use chrono::Local;
use std::num::NonZeroU16;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PROTOCOL_CHOICES: [(&str, Protocol); 3] = [
    ("both (tcp + udp)", Protocol::Both),
    ("tcp", Protocol::Tcp),
    ("udp", Protocol::Udp),
];

fn chosen<T: Copy>(choices: &[T], picked: Option<usize>) -> Result<T, CliError> {
    picked
        .and_then(|index| choices.get(index).copied())
        .ok_or(CliError::Cancelled)
}

/// Reset ufw to deny-incoming with the SSH port left open.
pub async fn initialize<E: PrivilegedExecutor>(session: &mut Session<E>) -> Result<(), CliError> {
    session.elevate().await?;
    let sshd_config = session.config.sshd_config.clone();
    let detected = detect_ssh_port(&sshd_config, session.executor_mut()).await;

    let ssh_port = ui::input_parsed::<NonZeroU16>(
        "SSH port to keep open",
        Some(&detected.to_string()),
    )?
    .get();

    ui::print_error("WARNING: this removes every existing ufw rule and resets the default policies.");
    if !ui::confirm(&format!(
        "Initialize the firewall keeping SSH port {} open?",
        ssh_port
    ))? {
        ui::print_warning("Initialization cancelled.");
        return Ok(());
    }

    let report = session.firewall().await?.initialize(ssh_port).await?;
    for warning in &report.warnings {
        ui::print_warning(warning);
    }
    ui::print_success(&format!(
        "Firewall initialized: incoming denied, outgoing allowed, SSH port {}/tcp allowed.",
        report.ssh_port
    ));
    Ok(())
}

fn ask_advanced(port: PortSpec, protocol: Protocol) -> Result<RuleSpec, CliError> {
    let action = chosen(
        &Action::ALL,
        ui::select("Action", &Action::ALL.map(|a| a.as_str()))?,
    )?;
    let direction = chosen(
        &Direction::ALL,
        ui::select("Direction", &Direction::ALL.map(|d| d.as_str()))?,
    )?;
    let source = ui::input_parsed::<Source>("Source address or network", Some("any"))?;

    Ok(RuleSpec {
        port,
        protocol,
        action,
        direction,
        source,
    })
}

pub async fn add_rule<E: PrivilegedExecutor>(session: &mut Session<E>) -> Result<(), CliError> {
    let port = ui::input_parsed::<PortSpec>("Port or range (e.g. 443 or 6000-6007)", None)?;
    let labels: Vec<&str> = PROTOCOL_CHOICES.iter().map(|(label, _)| *label).collect();
    let protocol = chosen(&PROTOCOL_CHOICES, ui::select("Protocol", &labels)?)?.1;

    let modes = ["Simple (allow incoming from anywhere)", "Advanced"];
    let spec = match ui::select("Mode", &modes)? {
        Some(0) => RuleSpec::simple(port, protocol),
        Some(_) => {
            let spec = ask_advanced(port, protocol)?;
            println!(
                "\n{} {} {} {} from {}",
                ui::format_header("Rule:"),
                spec.action,
                spec.direction,
                ui::format_highlight(&spec.port_arg()),
                spec.source
            );
            println!(
                "{} {}",
                ui::format_header("Command:"),
                spec.preview(&session.config.ufw_program)
            );
            if !ui::confirm("Add this rule?")? {
                ui::print_warning("Rule not added.");
                return Ok(());
            }
            spec
        }
        None => return Err(CliError::Cancelled),
    };

    match session.firewall().await?.add_rule(&spec).await? {
        AddOutcome::Added => ui::print_success(&format!("Rule added: {}", spec.port_arg())),
        AddOutcome::Duplicate => ui::print_warning(&format!(
            "An identical rule already exists, nothing changed ({})",
            spec.canonical().to_lowercase()
        )),
    }
    Ok(())
}

pub async fn delete_rule<E: PrivilegedExecutor>(session: &mut Session<E>) -> Result<(), CliError> {
    let mut firewall = session.firewall().await?;
    let records = firewall.rule_records().await?;
    if records.is_empty() {
        ui::print_warning("There are no rules to delete.");
        return Ok(());
    }

    ui::print_header("Current rules:");
    ui::print_rules(&records);

    let number = ui::input_parsed::<u32>("Rule number to delete", None)?;
    let record = records
        .iter()
        .find(|record| record.index == number)
        .ok_or_else(|| CliError::Validation(format!("rule {} does not exist", number)))?;

    if !ui::confirm(&format!("Delete rule [{}] {}?", record.index, record.content))? {
        ui::print_warning("Rule not deleted.");
        return Ok(());
    }

    firewall.delete_rule(number).await?;
    ui::print_success(&format!("Rule {} deleted.", number));
    Ok(())
}

pub async fn show_status<E: PrivilegedExecutor>(session: &mut Session<E>) -> Result<(), CliError> {
    let mut firewall = session.firewall().await?;
    let verbose = firewall.verbose_status().await?;
    let numbered = firewall.numbered_status().await?;

    ui::print_header("Firewall status:");
    println!("{}", summary(&verbose));

    ui::print_header("Rules:");
    let table = rule_table(&numbered);
    if table.len() <= 1 {
        println!("  {}", ui::format_warning("(No rules)"));
    } else {
        for line in table {
            println!("{}", line);
        }
    }
    Ok(())
}

pub async fn enable<E: PrivilegedExecutor>(session: &mut Session<E>) -> Result<(), CliError> {
    session.firewall().await?.enable().await?;
    ui::print_success("Firewall enabled.");
    Ok(())
}

pub async fn disable<E: PrivilegedExecutor>(session: &mut Session<E>) -> Result<(), CliError> {
    session.firewall().await?.disable().await?;
    ui::print_success("Firewall disabled.");
    Ok(())
}

pub async fn reload<E: PrivilegedExecutor>(session: &mut Session<E>) -> Result<(), CliError> {
    session.firewall().await?.reload().await?;
    ui::print_success("Firewall reloaded.");
    Ok(())
}

/// Save the current numbered listing as a new snapshot file.
pub async fn export_snapshot<E: PrivilegedExecutor>(
    session: &mut Session<E>,
) -> Result<PathBuf, CliError> {
    let records = session.firewall().await?.rule_records().await?;
    if records.is_empty() {
        warn!("Exporting an empty rule list");
    }

    let now = Local::now();
    let snapshot = Snapshot::from_records(&records, now);
    let path = session.store.save_export(&snapshot, now).await?;
    ui::print_success(&format!(
        "Exported {} rules to {}",
        snapshot.rules.len(),
        path.display()
    ));
    Ok(path)
}

/// Replay a snapshot. A file without rules is rejected before anything runs.
pub async fn import_snapshot<E: PrivilegedExecutor>(
    session: &mut Session<E>,
    file: &Path,
    assume_yes: bool,
) -> Result<(), CliError> {
    let snapshot = session.store.load(file).await?;
    let plan = snapshot.replay_plan()?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    ui::print_header("Snapshot:");
    println!("  File:        {}", ui::format_highlight(&name));
    println!("  Exported at: {}", snapshot.export_time);
    println!("  Rules:       {}", snapshot.rules.len());

    let skipped = snapshot.rules.len() - plan.len();
    if skipped > 0 {
        ui::print_warning(&format!(
            "{} rule(s) could not be recognized and will be skipped.",
            skipped
        ));
    }

    if !assume_yes && !ui::confirm("Apply these rules?")? {
        ui::print_warning("Import cancelled.");
        return Ok(());
    }

    let report = session.firewall().await?.replay(&plan).await?;
    for (command, reason) in &report.failures {
        ui::print_error(&format!("Failed: {} ({})", command, reason));
    }
    info!("Imported {} of {} rules from {}", report.applied, plan.len(), name);
    ui::print_success(&format!(
        "Imported {} of {} rules.",
        report.applied,
        plan.len()
    ));
    Ok(())
}

/// Write a deduplicated, sorted copy of a snapshot. Never touches the firewall.
pub async fn organize_snapshot<E: PrivilegedExecutor>(
    session: &Session<E>,
    file: &Path,
) -> Result<PathBuf, CliError> {
    let snapshot = session.store.load(file).await?;
    let now = Local::now();
    let organized = snapshot.organized(now)?;
    let path = session.store.save_organized(&organized, now).await?;
    ui::print_success(&format!(
        "Organized {} rules into {} and saved {}",
        snapshot.rules.len(),
        organized.rules.len(),
        path.display()
    ));
    Ok(path)
}

/// Let the operator pick one of the stored snapshot files.
pub async fn choose_snapshot<E: PrivilegedExecutor>(
    session: &Session<E>,
) -> Result<PathBuf, CliError> {
    let files = session.store.list_required().await?;
    let names: Vec<String> = files
        .iter()
        .map(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        })
        .collect();
    let picked = ui::select("Snapshot file", &names)?;
    picked
        .and_then(|index| files.get(index).cloned())
        .ok_or(CliError::Cancelled)
}
