//! Membership tests against ordered lists of CIDR entries.
//!
//! Malformed entries are skipped, never fatal: one typo in a configured list
//! must not break classification for every request. A skipped entry can only
//! narrow what matches. Skips are reported through [`SkippedEntry`] so the
//! caller can surface them.

use std::net::IpAddr;

use serde::Serialize;

use crate::addr::normalize_ip;
use crate::cidr::{parse_cidr, Cidr};
use crate::error::CidrParseError;

/// A configuration entry that failed to parse and was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Position in the original list.
    pub index: usize,
    pub entry: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: CidrParseError,
}

fn serialize_error<S: serde::Serializer>(e: &CidrParseError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(e)
}

/// Test `addr` against `entries`, first match wins.
///
/// Unparseable input addresses never match. Unparseable entries are skipped.
pub fn contains_ip<S: AsRef<str>>(addr: &str, entries: &[S]) -> bool {
    contains_ip_with(addr, entries, |_| {})
}

/// Like [`contains_ip`], reporting each skipped entry to `on_skip`.
///
/// Entries after the first match are not examined, so they are not reported.
pub fn contains_ip_with<S, F>(addr: &str, entries: &[S], mut on_skip: F) -> bool
where
    S: AsRef<str>,
    F: FnMut(SkippedEntry),
{
    let Some(ip) = normalize_ip(addr) else {
        return false;
    };

    for (index, entry) in entries.iter().enumerate() {
        let entry = entry.as_ref();
        match parse_cidr(entry) {
            Ok(cidr) => {
                if cidr.normalized().contains(&ip) {
                    return true;
                }
            }
            Err(error) => on_skip(SkippedEntry {
                index,
                entry: entry.to_string(),
                error,
            }),
        }
    }

    false
}

/// A pre-parsed, ordered CIDR list.
///
/// Matches exactly like [`contains_ip`] over the source strings, without
/// re-parsing on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CidrSet {
    ranges: Vec<Cidr>,
    skipped: Vec<SkippedEntry>,
}

impl CidrSet {
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut ranges = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let entry = entry.as_ref();
            match parse_cidr(entry) {
                Ok(cidr) => ranges.push(cidr.normalized()),
                Err(error) => skipped.push(SkippedEntry {
                    index,
                    entry: entry.to_string(),
                    error,
                }),
            }
        }

        Self { ranges, skipped }
    }

    /// Membership test for an already-normalized address.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.ranges.iter().any(|range| range.contains(ip))
    }

    /// Normalize `addr` and test it. Unparseable input is never a member.
    pub fn contains_str(&self, addr: &str) -> bool {
        normalize_ip(addr).is_some_and(|ip| self.contains(&ip))
    }

    pub fn ranges(&self) -> &[Cidr] {
        &self.ranges
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// True when no entry parsed (an empty or entirely malformed list).
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_host_entries() {
        assert!(contains_ip("127.0.0.1", &["127.0.0.1/32"]));
        assert!(!contains_ip("127.0.0.2", &["127.0.0.1/32"]));
        assert!(contains_ip("127.0.0.1", &["127.0.0.1"]));
    }

    #[test]
    fn network_entries() {
        assert!(contains_ip("10.1.2.3", &["10.0.0.0/8"]));
        assert!(!contains_ip("11.1.2.3", &["10.0.0.0/8"]));
        assert!(contains_ip("fd12:3456::1", &["fc00::/7"]));
    }

    #[test]
    fn no_cross_family_match() {
        assert!(!contains_ip("10.0.0.1", &["::1/128"]));
        assert!(!contains_ip("::1", &["0.0.0.0/0"]));
        assert!(!contains_ip("10.0.0.1", &["::/0"]));
    }

    #[test]
    fn mapped_input_matches_ipv4_entry() {
        assert!(contains_ip("::ffff:127.0.0.1", &["127.0.0.1/32"]));
        assert!(contains_ip("[::ffff:10.9.8.7]", &["10.0.0.0/8"]));
    }

    #[test]
    fn mapped_entry_matches_ipv4_input() {
        assert!(contains_ip("127.0.0.1", &["::ffff:127.0.0.1/128"]));
        assert!(contains_ip("127.0.0.1", &["::ffff:127.0.0.1"]));
        assert!(!contains_ip("127.0.0.2", &["::ffff:127.0.0.1"]));
    }

    #[test]
    fn malformed_entries_are_skipped_and_reported() {
        let entries = ["not-a-cidr", "10.0.0.0/99", "1.2.3.4/32"];
        let mut skipped = Vec::new();
        assert!(contains_ip_with("1.2.3.4", &entries, |s| skipped.push(s)));
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].index, 0);
        assert_eq!(skipped[0].entry, "not-a-cidr");
        assert_eq!(skipped[1].index, 1);
        assert!(matches!(
            skipped[1].error,
            CidrParseError::PrefixOutOfRange { prefix: 99, max: 32 }
        ));
    }

    #[test]
    fn first_match_short_circuits() {
        let mut skipped = 0;
        assert!(contains_ip_with(
            "10.0.0.1",
            &["10.0.0.0/8", "garbage"],
            |_| skipped += 1
        ));
        assert_eq!(skipped, 0);
    }

    #[test]
    fn unparseable_input_fails_closed() {
        assert!(!contains_ip("", &["0.0.0.0/0", "::/0"]));
        assert!(!contains_ip("localhost", &["0.0.0.0/0", "::/0"]));
        assert!(!contains_ip("10.0.0.1:443", &["0.0.0.0/0"]));
    }

    #[test]
    fn empty_list_matches_nothing() {
        let empty: [&str; 0] = [];
        assert!(!contains_ip("127.0.0.1", &empty));
    }

    #[test]
    fn cidr_set_agrees_with_string_path() {
        let entries = ["garbage", "10.0.0.0/8", "::ffff:192.168.0.0/112", "::1"];
        let set = CidrSet::parse(&entries);
        assert_eq!(set.ranges().len(), 3);
        assert_eq!(set.skipped().len(), 1);
        assert!(!set.is_empty());

        for addr in [
            "10.2.3.4",
            "192.168.4.4",
            "::ffff:192.168.4.4",
            "::1",
            "[::1]",
            "172.16.0.1",
            "::2",
            "nonsense",
        ] {
            assert_eq!(
                set.contains_str(addr),
                contains_ip(addr, &entries),
                "disagreement for {addr}"
            );
        }
    }

    #[test]
    fn skipped_entry_serializes_error_as_text() {
        let set = CidrSet::parse(&["bogus"]);
        let json = serde_json::to_value(&set.skipped()[0]).unwrap();
        assert_eq!(json["entry"], "bogus");
        assert_eq!(json["error"], "invalid address: bogus");
        assert!(set.is_empty());
    }
}
