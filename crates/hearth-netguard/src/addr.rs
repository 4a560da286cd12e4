//! Address normalization.
//!
//! Socket layers on dual-stack hosts report IPv4 peers as IPv4-mapped IPv6
//! addresses (`::ffff:a.b.c.d`) and HTTP tooling often brackets IPv6 literals.
//! Everything compared downstream goes through [`normalize_ip`] first so that
//! `127.0.0.1` and `::ffff:127.0.0.1` are the same address.

use std::net::IpAddr;

/// Remove one pair of surrounding brackets (`[::1]` -> `::1`).
///
/// Unbalanced brackets are left untouched and will fail to parse later.
pub fn strip_brackets(raw: &str) -> &str {
    raw.strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(raw)
}

/// Rewrite an IPv4-mapped IPv6 address to its plain IPv4 form.
pub fn demap(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

/// Parse a raw address string into a canonical [`IpAddr`].
///
/// Returns `None` for anything unparseable, including zone-scoped link-local
/// literals (`fe80::1%eth0`) and `host:port` pairs.
pub fn normalize_ip(raw: &str) -> Option<IpAddr> {
    strip_brackets(raw.trim()).parse::<IpAddr>().ok().map(demap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn strips_one_pair_of_brackets() {
        assert_eq!(strip_brackets("[::1]"), "::1");
        assert_eq!(strip_brackets("[[::1]]"), "[::1]");
        assert_eq!(strip_brackets("::1"), "::1");
        assert_eq!(strip_brackets("[::1"), "[::1");
        assert_eq!(strip_brackets("10.0.0.1"), "10.0.0.1");
    }

    #[test]
    fn mapped_ipv6_becomes_ipv4() {
        assert_eq!(
            normalize_ip("::ffff:127.0.0.1"),
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST))
        );
        assert_eq!(
            normalize_ip("[::ffff:192.168.1.5]"),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)))
        );
        // hex form of the same mapping
        assert_eq!(
            normalize_ip("::ffff:7f00:1"),
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST))
        );
    }

    #[test]
    fn compatible_form_is_not_demapped() {
        // ::a.b.c.d (deprecated IPv4-compatible) is a distinct IPv6 address
        let ip = normalize_ip("::127.0.0.1").unwrap();
        assert!(ip.is_ipv6());
    }

    #[test]
    fn plain_addresses_pass_through() {
        assert_eq!(
            normalize_ip("10.1.2.3"),
            Some(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)))
        );
        assert_eq!(normalize_ip("::1"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        assert_eq!(normalize_ip("[::1]"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(normalize_ip(""), None);
        assert_eq!(normalize_ip("not-an-ip"), None);
        assert_eq!(normalize_ip("10.0.0.256"), None);
        assert_eq!(normalize_ip("10.0.0.1:8080"), None);
        assert_eq!(normalize_ip("fe80::1%eth0"), None);
        assert_eq!(normalize_ip("[]"), None);
    }
}
