//! Target filtering against an externally supplied allow-list.

use std::collections::HashSet;

use tracing::info;

use crate::roster::RosterEntry;

/// Narrow a roster to the entries whose identifier appears in the
/// allow set. Matching is case-sensitive exact match after trimming.
/// Pure function, no remote calls; never adds entries.
pub fn filter_allowed(roster: Vec<RosterEntry>, allowed: &HashSet<String>) -> Vec<RosterEntry> {
    let before = roster.len();

    let filtered: Vec<RosterEntry> = roster
        .into_iter()
        .filter(|entry| allowed.contains(entry.identifier.trim()))
        .collect();

    info!(before, after = filtered.len(), "roster filtered against allow-list");
    filtered
}

/// Normalize raw allow-list lines into a set of identifiers.
///
/// Lines are trimmed and blanks dropped. A line without an `@` is
/// completed with `default_domain` when one is configured; lines that
/// already carry a domain pass through unchanged.
pub fn normalize_allow_list<I, S>(lines: I, default_domain: Option<&str>) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            if line.is_empty() {
                return None;
            }
            if line.contains('@') {
                return Some(line.to_string());
            }
            match default_domain {
                Some(domain) => Some(format!("{line}@{domain}")),
                None => Some(line.to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new("Alice", "a1@x"),
            RosterEntry::new("Bob", "b1@x"),
        ]
    }

    #[test]
    fn test_keeps_only_allowed_identifiers() {
        let allowed: HashSet<String> = ["a1@x".to_string()].into_iter().collect();
        let filtered = filter_allowed(roster(), &allowed);
        assert_eq!(filtered, vec![RosterEntry::new("Alice", "a1@x")]);
    }

    #[test]
    fn test_empty_allow_list_filters_everything() {
        let filtered = filter_allowed(roster(), &HashSet::new());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_identifiers_are_trimmed_before_matching() {
        let allowed: HashSet<String> = ["a1@x".to_string()].into_iter().collect();
        let padded = vec![RosterEntry::new("Alice", " a1@x ")];
        assert_eq!(filter_allowed(padded, &allowed).len(), 1);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let allowed: HashSet<String> = ["A1@X".to_string()].into_iter().collect();
        assert!(filter_allowed(roster(), &allowed).is_empty());
    }

    #[test]
    fn test_normalize_completes_bare_usernames() {
        let allowed = normalize_allow_list(
            ["jd123", "  ", "full@example.edu", " trimmed "],
            Some("example.edu"),
        );
        assert!(allowed.contains("jd123@example.edu"));
        assert!(allowed.contains("full@example.edu"));
        assert!(allowed.contains("trimmed@example.edu"));
        assert_eq!(allowed.len(), 3);
    }

    #[test]
    fn test_normalize_without_domain_passes_through() {
        let allowed = normalize_allow_list(["jd123"], None);
        assert!(allowed.contains("jd123"));
    }
}
