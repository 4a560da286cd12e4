//! Trusted-proxy resolution of the client address.
//!
//! Only the immediate peer is checked against the trusted-proxy list. When it
//! is trusted, the leftmost `X-Forwarded-For` entry is taken as the client;
//! intermediate hops named in the header are not validated. A trusted proxy
//! that forwards a client-supplied header unchanged therefore lets that
//! client choose its own address. Deployments must configure their proxies
//! to overwrite the header, not append to an untrusted one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::addr::strip_brackets;
use crate::set::CidrSet;

/// How the client address was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientSource {
    /// The transport peer itself.
    #[serde(rename = "socket")]
    Socket,
    /// The first entry of a forwarded-address header sent by a trusted proxy.
    #[serde(rename = "x-forwarded-for")]
    ForwardedFor,
    /// No peer address was available.
    #[serde(rename = "unknown")]
    Unknown,
}

impl ClientSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientSource::Socket => "socket",
            ClientSource::ForwardedFor => "x-forwarded-for",
            ClientSource::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClientSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved client address, bracket-stripped, and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedClient {
    pub ip: Option<String>,
    pub source: ClientSource,
}

impl ResolvedClient {
    fn unknown() -> Self {
        Self {
            ip: None,
            source: ClientSource::Unknown,
        }
    }

    fn socket(peer: &str) -> Self {
        Self {
            ip: Some(strip_brackets(peer).to_string()),
            source: ClientSource::Socket,
        }
    }

    fn forwarded(entry: &str) -> Self {
        Self {
            ip: Some(strip_brackets(entry).to_string()),
            source: ClientSource::ForwardedFor,
        }
    }
}

/// Leftmost non-empty, trimmed entry of a comma-separated header value.
///
/// Tokens are passed through as-is; a malformed token is still returned and
/// simply fails to match any range later.
pub fn first_forwarded(header: &str) -> Option<&str> {
    header.split(',').map(str::trim).find(|s| !s.is_empty())
}

/// Trusted-proxy list parsed once for repeated resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustChain {
    trusted_proxies: CidrSet,
}

impl TrustChain {
    pub fn new<S: AsRef<str>>(trusted_proxies: &[S]) -> Self {
        Self {
            trusted_proxies: CidrSet::parse(trusted_proxies),
        }
    }

    pub fn trusted_proxies(&self) -> &CidrSet {
        &self.trusted_proxies
    }

    /// Decide the client address for one request.
    ///
    /// - no peer: unknown
    /// - untrusted peer: the peer, header ignored
    /// - trusted peer, empty header: the peer
    /// - trusted peer: leftmost header entry
    pub fn resolve(&self, peer: Option<&str>, forwarded_for: Option<&str>) -> ResolvedClient {
        let peer = match peer {
            Some(p) if !p.trim().is_empty() => p.trim(),
            _ => return ResolvedClient::unknown(),
        };

        if !self.trusted_proxies.contains_str(peer) {
            return ResolvedClient::socket(peer);
        }

        match forwarded_for.and_then(first_forwarded) {
            Some(entry) => ResolvedClient::forwarded(entry),
            None => ResolvedClient::socket(peer),
        }
    }
}

/// One-shot resolution against a raw trusted-proxy list.
///
/// Equivalent to `TrustChain::new(trusted_proxies).resolve(peer, forwarded_for)`.
pub fn resolve_client<S: AsRef<str>>(
    peer: Option<&str>,
    forwarded_for: Option<&str>,
    trusted_proxies: &[S],
) -> ResolvedClient {
    TrustChain::new(trusted_proxies).resolve(peer, forwarded_for)
}
