use super::{export, import, interactive, organize, status};
use crate::config::{default_dir, AppConfig};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub const VERSION_INFO: &str = env!("UFWM_BUILD_VERSION");

#[derive(Parser, Debug)]
#[command(name = "ufw-manager")]
#[command(about = "Interactive front-end for the Uncomplicated Firewall", long_about = None, version = VERSION_INFO)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding rule snapshots
    #[arg(long, env = "UFWM_RULES_DIR", global = true)]
    pub rules_dir: Option<PathBuf>,

    /// Directory for operations.log and errors.log
    #[arg(long, env = "UFWM_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// ufw binary to run
    #[arg(long = "ufw", default_value = "ufw", global = true)]
    pub ufw_program: String,

    /// sudo binary used for privilege elevation
    #[arg(long = "sudo", default_value = "sudo", global = true)]
    pub sudo_program: String,

    /// sshd configuration consulted for the SSH port
    #[arg(long, default_value = "/etc/ssh/sshd_config", global = true)]
    pub sshd_config: PathBuf,

    /// Increase message verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive menu (default)
    Menu(interactive::Menu),

    /// Print the firewall summary and rule table
    Status(status::Status),

    /// Write the current rules to a new snapshot file
    Export(export::Export),

    /// Replay the rules of a snapshot file
    Import(import::Import),

    /// Write a deduplicated, sorted copy of a snapshot file
    Organize(organize::Organize),
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            rules_dir: self
                .rules_dir
                .clone()
                .unwrap_or_else(|| default_dir("rules")),
            log_dir: self.log_dir.clone().unwrap_or_else(|| default_dir("logs")),
            ufw_program: self.ufw_program.clone(),
            sudo_program: self.sudo_program.clone(),
            sshd_config: self.sshd_config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["ufw-manager"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.app_config().ufw_program, "ufw");
    }

    #[test]
    fn global_flags_build_the_config() {
        let cli = Cli::try_parse_from([
            "ufw-manager",
            "export",
            "--rules-dir",
            "/srv/rules",
            "--log-dir",
            "/srv/logs",
            "--ufw",
            "/usr/local/sbin/ufw",
            "-vv",
        ])
        .unwrap();
        let config = cli.app_config();
        assert_eq!(config.rules_dir, PathBuf::from("/srv/rules"));
        assert_eq!(config.log_dir, PathBuf::from("/srv/logs"));
        assert_eq!(config.ufw_program, "/usr/local/sbin/ufw");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Export(_))));
    }

    #[test]
    fn import_takes_a_file_and_yes_flag() {
        let cli =
            Cli::try_parse_from(["ufw-manager", "import", "ufw_rules_20240501_120000.yaml", "--yes"])
                .unwrap();
        match cli.command {
            Some(Commands::Import(import)) => {
                assert_eq!(import.file, PathBuf::from("ufw_rules_20240501_120000.yaml"));
                assert!(import.yes);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn organize_requires_a_file() {
        assert!(Cli::try_parse_from(["ufw-manager", "organize"]).is_err());
    }
}
