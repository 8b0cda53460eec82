//! Best-effort detection of the port sshd listens on, used to pre-fill the
//! initialization prompt so the operator does not lock themselves out.

use crate::executor::{argv, CommandExecutor};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SSH_PORT: u16 = 22;

lazy_static! {
    static ref LISTEN_PORT: Regex = Regex::new(r":(\d+)\s").unwrap();
}

/// First uncommented `Port <n>` directive.
pub fn port_from_sshd_config(contents: &str) -> Option<u16> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some(keyword), Some(value)) if keyword.eq_ignore_ascii_case("port") => {
                    value.parse::<u16>().ok().filter(|p| *p > 0)
                }
                _ => None,
            }
        })
}

/// Local port of the first listening socket owned by sshd in `ss -tlnp` output.
pub fn port_from_listening_sockets(ss_output: &str) -> Option<u16> {
    ss_output
        .lines()
        .filter(|line| line.contains("sshd"))
        .find_map(|line| {
            LISTEN_PORT
                .captures(line)
                .and_then(|caps| caps[1].parse::<u16>().ok())
                .filter(|p| *p > 0)
        })
}

/// sshd_config first, then listening sockets, then 22.
pub async fn detect_ssh_port(
    sshd_config: &Path,
    executor: &mut (dyn CommandExecutor + Send),
) -> u16 {
    match tokio::fs::read_to_string(sshd_config).await {
        Ok(contents) => {
            if let Some(port) = port_from_sshd_config(&contents) {
                debug!("SSH port {} from {}", port, sshd_config.display());
                return port;
            }
        }
        Err(e) => debug!("Cannot read {}: {}", sshd_config.display(), e),
    }

    match executor.execute_command(&argv(["ss", "-tlnp"])).await {
        Ok(result) if result.is_success() => {
            let listing = result.output.to_stdout_string().unwrap_or_default();
            if let Some(port) = port_from_listening_sockets(&listing) {
                debug!("SSH port {} from listening sockets", port);
                return port;
            }
        }
        Ok(result) => debug!("ss failed: {}", result.output.stderr_lossy()),
        Err(e) => debug!("Cannot run ss: {}", e),
    }

    DEFAULT_SSH_PORT
}
