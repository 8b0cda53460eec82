//! Validated rule tuples and the `ufw` argument vectors built from them.

use super::{Action, Direction, Protocol};
use ipnetwork::IpNetwork;
use std::fmt;
use std::str::FromStr;

const MIN_PORT: u32 = 1;
const MAX_PORT: u32 = 65535;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("port cannot be empty")]
    EmptyPort,

    #[error("port {0} is outside 1-65535")]
    PortOutOfRange(String),

    #[error("port range '{0}' is invalid: both ends must be within 1-65535 and start must not exceed end")]
    InvalidRange(String),

    #[error("'{0}' is not a port or a port range")]
    InvalidPort(String),

    #[error("unknown protocol '{0}' (expected tcp, udp or both)")]
    InvalidProtocol(String),

    #[error("unknown action '{0}' (expected allow, deny or reject)")]
    InvalidAction(String),

    #[error("unknown direction '{0}' (expected in, out or routed)")]
    InvalidDirection(String),

    #[error("'{0}' is not an IP address, a network or 'any'")]
    InvalidSource(String),
}

/// A single port or an inclusive `start-end` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSpec {
    Single(u16),
    Range { start: u16, end: u16 },
}

impl PortSpec {
    /// Lowest port covered by this spec.
    pub fn first_port(&self) -> u16 {
        match self {
            PortSpec::Single(port) => *port,
            PortSpec::Range { start, .. } => *start,
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn bounded_port(s: &str) -> Option<u16> {
    s.parse::<u32>()
        .ok()
        .filter(|port| (MIN_PORT..=MAX_PORT).contains(port))
        .map(|port| port as u16)
}

impl FromStr for PortSpec {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::EmptyPort);
        }

        if is_digits(s) {
            return bounded_port(s)
                .map(PortSpec::Single)
                .ok_or_else(|| RuleError::PortOutOfRange(s.to_string()));
        }

        match s.split_once('-') {
            Some((start, end)) if is_digits(start) && is_digits(end) => {
                match (bounded_port(start), bounded_port(end)) {
                    (Some(start), Some(end)) if start <= end => Ok(PortSpec::Range { start, end }),
                    _ => Err(RuleError::InvalidRange(s.to_string())),
                }
            }
            _ => Err(RuleError::InvalidPort(s.to_string())),
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Single(port) => write!(f, "{}", port),
            PortSpec::Range { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}

/// Where matching traffic comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Source {
    #[default]
    Any,
    /// An IP literal or CIDR network, kept as the operator typed it.
    Address(String),
}

impl FromStr for Source {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("any") {
            return Ok(Source::Any);
        }
        s.parse::<IpNetwork>()
            .map(|_| Source::Address(s.to_string()))
            .map_err(|_| RuleError::InvalidSource(s.to_string()))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Any => f.write_str("any"),
            Source::Address(addr) => f.write_str(addr),
        }
    }
}

/// A fully validated rule, ready to be turned into a `ufw` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub port: PortSpec,
    pub protocol: Protocol,
    pub action: Action,
    pub direction: Direction,
    pub source: Source,
}

impl RuleSpec {
    /// Incoming allow from anywhere, the "simple mode" defaults.
    pub fn simple(port: PortSpec, protocol: Protocol) -> Self {
        Self {
            port,
            protocol,
            action: Action::default(),
            direction: Direction::default(),
            source: Source::default(),
        }
    }

    /// Validate raw operator input. Nothing is coerced.
    pub fn parse(
        port: &str,
        protocol: &str,
        action: &str,
        direction: &str,
        source: &str,
    ) -> Result<Self, RuleError> {
        Ok(Self {
            port: port.parse()?,
            protocol: protocol.parse()?,
            action: action.parse()?,
            direction: direction.parse()?,
            source: source.parse()?,
        })
    }

    /// `<port>` or `<port>/<protocol>`.
    pub fn port_arg(&self) -> String {
        match self.protocol {
            Protocol::Both => self.port.to_string(),
            proto => format!("{}/{}", self.port, proto.suffix()),
        }
    }

    /// Argument vector for the firewall tool, without the program name.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![self.action.as_str().to_string()];
        if self.direction != Direction::In {
            args.push(self.direction.as_str().to_string());
        }
        args.push(self.port_arg());
        if let Source::Address(addr) = &self.source {
            args.push("from".to_string());
            args.push(addr.clone());
        }
        args
    }

    /// The full command line as the operator would type it.
    pub fn preview(&self, program: &str) -> String {
        format!("{} {}", program, self.to_args().join(" "))
    }

    /// `ACTION DIRECTION PORT[/PROTOCOL] [FROM SOURCE]`, used only for duplicate matching.
    pub fn canonical(&self) -> String {
        let mut canonical = format!(
            "{} {} {}",
            self.action.as_str(),
            self.direction.as_str(),
            self.port_arg()
        );
        if let Source::Address(addr) = &self.source {
            canonical.push_str(" from ");
            canonical.push_str(addr);
        }
        canonical.to_uppercase()
    }
}
