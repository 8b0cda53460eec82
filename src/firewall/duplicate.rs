use super::rule::RuleSpec;
use super::status::RuleRecord;

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Textual duplicate check against an existing listing.
///
/// Records are compared with the candidate's canonical form after stripping
/// all whitespace and upper-casing both sides. This is a heuristic: a rule
/// already covered by a broader one (`80` vs `80/tcp`) is not detected.
pub fn is_duplicate(existing: &[RuleRecord], candidate: &RuleSpec) -> bool {
    let wanted = normalize(&candidate.canonical());
    existing
        .iter()
        .any(|record| normalize(&record.content) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firewall::{Action, Direction, PortSpec, Protocol, Source};

    fn record(index: u32, content: &str) -> RuleRecord {
        RuleRecord {
            index,
            content: content.to_string(),
        }
    }

    #[test]
    fn match_ignores_case_and_whitespace() {
        let existing = vec![record(1, "allow   in 80/tcp")];
        let candidate = RuleSpec::simple(PortSpec::Single(80), Protocol::Tcp);
        assert!(is_duplicate(&existing, &candidate));

        let existing = vec![record(1, "ALLOW IN 80/tcp")];
        assert!(is_duplicate(&existing, &candidate));
    }

    #[test]
    fn empty_listing_never_matches() {
        let candidate = RuleSpec::simple(PortSpec::Single(80), Protocol::Tcp);
        assert!(!is_duplicate(&[], &candidate));
    }

    #[test]
    fn broader_rule_is_not_detected() {
        let existing = vec![record(1, "ALLOW IN 80")];
        let candidate = RuleSpec::simple(PortSpec::Single(80), Protocol::Tcp);
        assert!(!is_duplicate(&existing, &candidate));
    }

    #[test]
    fn source_is_part_of_the_match() {
        let existing = vec![record(4, "DENY OUT 443/tcp FROM 10.0.0.5")];
        let candidate = RuleSpec {
            port: PortSpec::Single(443),
            protocol: Protocol::Tcp,
            action: Action::Deny,
            direction: Direction::Out,
            source: Source::Address("10.0.0.5".to_string()),
        };
        assert!(is_duplicate(&existing, &candidate));

        let elsewhere = RuleSpec {
            source: Source::Address("10.0.0.6".to_string()),
            ..candidate
        };
        assert!(!is_duplicate(&existing, &elsewhere));
    }
}
