use std::net::IpAddr;

use serde::Serialize;

use crate::addr::normalize_ip;
use crate::config::{CidrList, TrustConfig};
use crate::resolver::{ClientSource, ResolvedClient, TrustChain};
use crate::set::{CidrSet, SkippedEntry};

/// Local ranges used when the configuration supplies none.
pub const DEFAULT_LOCAL_CIDRS: [&str; 4] = [
    "127.0.0.1/32",
    "::1/128",
    "10.0.0.0/8",
    "192.168.0.0/16",
];

/// Outcome of classifying one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The address treated as the client, bracket-stripped. Taken verbatim
    /// from the peer or the forwarded header, so it may not be a valid IP.
    pub client_ip: Option<String>,
    pub source: ClientSource,
    pub is_local: bool,
}

impl Classification {
    /// The client address parsed and normalized, if it is a valid IP.
    pub fn client_addr(&self) -> Option<IpAddr> {
        self.client_ip.as_deref().and_then(normalize_ip)
    }
}

/// Decides whether a request comes from the configured local network.
///
/// Holds only immutable, pre-parsed configuration: share one instance (for
/// example behind an `Arc`) across all request handlers.
#[derive(Debug, Clone)]
pub struct LocalClassifier {
    chain: TrustChain,
    local: CidrSet,
    using_default_local: bool,
}

impl LocalClassifier {
    pub fn new(config: &TrustConfig) -> Self {
        let using_default_local = config.local_cidrs.is_empty();
        let local = if using_default_local {
            CidrSet::parse(&DEFAULT_LOCAL_CIDRS)
        } else {
            CidrSet::parse(&config.local_cidrs)
        };

        Self {
            chain: TrustChain::new(&config.trusted_proxies),
            local,
            using_default_local,
        }
    }

    /// Resolve the client address and test it against the local ranges.
    ///
    /// Total: every input, including absent or malformed ones, produces a
    /// result, and anything ambiguous classifies as not local.
    pub fn classify(&self, peer: Option<&str>, forwarded_for: Option<&str>) -> Classification {
        let ResolvedClient { ip, source } = self.chain.resolve(peer, forwarded_for);
        let is_local = ip
            .as_deref()
            .is_some_and(|client| self.local.contains_str(client));

        Classification {
            client_ip: ip,
            source,
            is_local,
        }
    }

    /// Run only the trusted-proxy resolution step.
    pub fn resolve(&self, peer: Option<&str>, forwarded_for: Option<&str>) -> ResolvedClient {
        self.chain.resolve(peer, forwarded_for)
    }

    /// Configuration entries ignored because they failed to parse.
    pub fn skipped_entries(&self) -> Vec<(CidrList, SkippedEntry)> {
        self.chain
            .trusted_proxies()
            .skipped()
            .iter()
            .map(|s| (CidrList::TrustedProxies, s.clone()))
            .chain(
                self.local
                    .skipped()
                    .iter()
                    .map(|s| (CidrList::LocalCidrs, s.clone())),
            )
            .collect()
    }

    pub fn trusted_proxies(&self) -> &CidrSet {
        self.chain.trusted_proxies()
    }

    pub fn local_ranges(&self) -> &CidrSet {
        &self.local
    }

    /// True when the built-in [`DEFAULT_LOCAL_CIDRS`] are in effect.
    pub fn using_default_local(&self) -> bool {
        self.using_default_local
    }
}
