use super::errors::{SnapshotError, SnapshotResult};
use super::types::{Snapshot, SnapshotRule};
use crate::firewall::{Action, PortSpec, Protocol, RuleRecord, RuleSpec};
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Format of the time stamps stored inside snapshot files.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

lazy_static! {
    static ref FIRST_NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

// Rules without any number sort after everything else.
const NO_NUMBER: u32 = u32::MAX;

/// First run of digits in a rule's text.
pub fn first_number(content: &str) -> Option<u32> {
    FIRST_NUMBER
        .find(content)
        .and_then(|m| m.as_str().parse().ok())
}

/// Action named anywhere in the text, checked in allow, deny, reject order.
pub fn recover_action(content: &str) -> Option<Action> {
    let upper = content.to_uppercase();
    [
        ("ALLOW", Action::Allow),
        ("DENY", Action::Deny),
        ("REJECT", Action::Reject),
    ]
    .into_iter()
    .find(|(needle, _)| upper.contains(needle))
    .map(|(_, action)| action)
}

/// Minimal rule recovered from persisted text: action and port only.
///
/// Protocol, direction and source are not recovered.
pub fn recover_rule(content: &str) -> Option<RuleSpec> {
    let action = recover_action(content)?;
    let port = first_number(content)
        .filter(|p| (1..=u16::MAX as u32).contains(p))
        .map(|p| PortSpec::Single(p as u16))?;
    Some(RuleSpec {
        action,
        ..RuleSpec::simple(port, Protocol::Both)
    })
}

impl Snapshot {
    /// Capture a numbered listing. The verbose summary is never persisted.
    pub fn from_records(records: &[RuleRecord], now: DateTime<Local>) -> Self {
        Self {
            export_time: now.format(TIME_FORMAT).to_string(),
            rules: records
                .iter()
                .map(|record| SnapshotRule {
                    number: record.index,
                    content: record.content.clone(),
                })
                .collect(),
            organize_time: None,
            original_count: None,
            organized_count: None,
        }
    }

    pub fn from_yaml(text: &str) -> SnapshotResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> SnapshotResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn ensure_rules(&self) -> SnapshotResult<()> {
        if self.rules.is_empty() {
            return Err(SnapshotError::NoRules);
        }
        Ok(())
    }

    /// Commands to replay on import, in file order. Unrecognized rules are skipped.
    pub fn replay_plan(&self) -> SnapshotResult<Vec<RuleSpec>> {
        self.ensure_rules()?;
        Ok(self
            .rules
            .iter()
            .filter_map(|rule| {
                let recovered = recover_rule(&rule.content);
                if recovered.is_none() {
                    tracing::debug!("Skipping unrecognized rule '{}'", rule.content);
                }
                recovered
            })
            .collect())
    }

    /// Drop repeated rule texts (first wins) and sort by the first number in each rule.
    pub fn organized(&self, now: DateTime<Local>) -> SnapshotResult<Snapshot> {
        self.ensure_rules()?;

        let mut seen = HashSet::new();
        let mut rules: Vec<SnapshotRule> = self
            .rules
            .iter()
            .filter(|rule| seen.insert(rule.content.as_str()))
            .cloned()
            .collect();
        rules.sort_by_key(|rule| first_number(&rule.content).unwrap_or(NO_NUMBER));

        Ok(Snapshot {
            export_time: self.export_time.clone(),
            organize_time: Some(now.format(TIME_FORMAT).to_string()),
            original_count: Some(self.rules.len()),
            organized_count: Some(rules.len()),
            rules,
        })
    }
}
