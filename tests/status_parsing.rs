mod common;

use common::{STATUS_NUMBERED, STATUS_VERBOSE};
use ufw_manager::firewall::status::{parse_records, rule_table, summary};
use ufw_manager::firewall::{is_duplicate, PortSpec, Protocol, RuleSpec};

#[test]
fn summary_stops_at_rule_header() {
    let summary = summary(STATUS_VERBOSE);
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Status: active",
            "Logging: on (low)",
            "Default: deny (incoming), allow (outgoing), disabled (routed)",
            "New profiles: skip",
        ]
    );
    assert!(!summary.contains("22/tcp"));
}

#[test]
fn rule_table_starts_at_header_and_skips_status() {
    let table = rule_table(STATUS_NUMBERED);
    assert!(table[0].starts_with("To"));
    assert!(table.iter().all(|line| !line.starts_with("Status:")));
    assert_eq!(table.len(), 6);
}

#[test]
fn numbered_fixture_yields_every_rule() {
    let records = parse_records(STATUS_NUMBERED);
    let indices: Vec<u32> = records.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert!(records[2].content.starts_with("8080"));
    assert!(records[2].content.ends_with("10.0.0.0/8"));
}

#[test]
fn duplicate_check_matches_action_first_records() {
    let records = parse_records("[ 1] ALLOW IN 80/tcp\n[ 2] DENY IN 25\n");
    let http = RuleSpec::simple(PortSpec::Single(80), Protocol::Tcp);
    let https = RuleSpec::simple(PortSpec::Single(443), Protocol::Tcp);
    assert!(is_duplicate(&records, &http));
    assert!(!is_duplicate(&records, &https));
}

// ufw lists rules port first (`22/tcp ALLOW IN Anywhere`), so the textual
// check never matches them. Adding such a rule again is left to ufw, which
// answers "Skipping adding existing rule".
#[test]
fn duplicate_check_misses_port_first_listing() {
    let records = parse_records(STATUS_NUMBERED);
    let ssh = RuleSpec::simple(PortSpec::Single(22), Protocol::Tcp);
    assert!(records.iter().any(|r| r.content.starts_with("22/tcp")));
    assert!(!is_duplicate(&records, &ssh));
}
