pub mod duplicate;
pub mod rule;
pub mod ssh_port;
pub mod status;
mod ufw;

use crate::executor::{ExecutorError, OutputError};
use std::fmt;
use std::str::FromStr;

pub use duplicate::is_duplicate;
pub use rule::{PortSpec, RuleError, RuleSpec, Source};
pub use status::{RuleRecord, StatusProvider};
pub use ufw::{AddOutcome, InitReport, ReplayReport, UfwManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    Tcp,
    Udp,
    /// No protocol suffix, ufw applies the rule to tcp and udp.
    #[default]
    Both,
}

impl Protocol {
    /// Suffix used after the port, empty for both.
    pub fn suffix(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Both => "",
        }
    }
}

impl FromStr for Protocol {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "" | "both" | "any" => Ok(Protocol::Both),
            other => Err(RuleError::InvalidProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
            Protocol::Both => write!(f, "tcp+udp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Allow,
    Deny,
    Reject,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Allow, Action::Deny, Action::Reject];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Deny => "deny",
            Action::Reject => "reject",
        }
    }
}

impl FromStr for Action {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(Action::Allow),
            "deny" => Ok(Action::Deny),
            "reject" => Ok(Action::Reject),
            other => Err(RuleError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    Routed,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::In, Direction::Out, Direction::Routed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::Routed => "routed",
        }
    }
}

impl FromStr for Direction {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "routed" => Ok(Direction::Routed),
            other => Err(RuleError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FirewallError {
    #[error("Invalid rule: {0}")]
    Validation(#[from] RuleError),

    #[error("'{command}' failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Output processing error: {0}")]
    Output(#[from] OutputError),
}

pub type FirewallResult<T> = Result<T, FirewallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_parsing_accepts_empty_as_both() {
        assert_eq!("".parse::<Protocol>().unwrap(), Protocol::Both);
        assert_eq!("TCP".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert!("icmp".parse::<Protocol>().is_err());
    }

    #[test]
    fn direction_and_action_reject_unknown_words() {
        assert_eq!("Routed".parse::<Direction>().unwrap(), Direction::Routed);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(RuleError::InvalidDirection(_))
        ));
        assert!(matches!("drop".parse::<Action>(), Err(RuleError::InvalidAction(_))));
    }
}
