//! Scraping of `ufw status verbose` and `ufw status numbered` reports.
//!
//! The firewall tool only speaks human-readable text, so everything here is
//! line oriented and tolerant: unknown lines are skipped, never rejected.

use super::FirewallResult;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RECORD_LINE: Regex = Regex::new(r"^\s*\[\s*(\d+)\s*\](.*)$").unwrap();
}

/// One line of the numbered rule listing.
///
/// `index` is only meaningful for the listing it was parsed from: ufw
/// renumbers its rules after every deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub index: u32,
    pub content: String,
}

/// Anything that can hand out the raw status reports.
#[async_trait]
pub trait StatusProvider: Send {
    async fn verbose_status(&mut self) -> FirewallResult<String>;

    async fn numbered_status(&mut self) -> FirewallResult<String>;

    /// Parsed records of a fresh numbered listing.
    async fn rule_records(&mut self) -> FirewallResult<Vec<RuleRecord>> {
        let numbered = self.numbered_status().await?;
        Ok(parse_records(&numbered))
    }
}

/// The column header introducing the rule table (`To ... Action ... From`).
pub fn is_rule_header(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("To") && line.ends_with("From")
}

/// Non-empty lines of a verbose report that precede the rule table.
pub fn summary(verbose: &str) -> String {
    verbose
        .lines()
        .map(str::trim)
        .take_while(|line| !is_rule_header(line))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The header line and every non-empty line after it, `Status:` lines excluded.
pub fn rule_table(numbered: &str) -> Vec<String> {
    let mut table = Vec::new();
    let mut in_table = false;

    for line in numbered.lines().map(str::trim) {
        if line.starts_with("Status:") {
            continue;
        }
        if is_rule_header(line) {
            in_table = true;
            table.push(line.to_string());
            continue;
        }
        if in_table && !line.is_empty() {
            table.push(line.to_string());
        }
    }

    table
}

/// Parse `[<N>] <content>`. Anything else yields `None`.
pub fn parse_record(line: &str) -> Option<RuleRecord> {
    let caps = RECORD_LINE.captures(line)?;
    let index = caps[1].parse::<u32>().ok().filter(|n| *n > 0)?;
    let content = caps[2].trim();
    if content.is_empty() || content.starts_with("Status:") {
        return None;
    }
    Some(RuleRecord {
        index,
        content: content.to_string(),
    })
}

/// All records found in a numbered report, in listing order.
pub fn parse_records(numbered: &str) -> Vec<RuleRecord> {
    numbered.lines().filter_map(parse_record).collect()
}
