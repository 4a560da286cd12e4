use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::LocalClassifier;
use crate::error::ConfigError;
use crate::set::SkippedEntry;

const TRUSTED_PROXIES_VAR: &str = "TRUSTED_PROXIES";
const LOCAL_CIDRS_VAR: &str = "LOCAL_CIDRS";
const STRICT_CONFIG_VAR: &str = "NETGUARD_STRICT_CONFIG";

/// Which configured list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CidrList {
    TrustedProxies,
    LocalCidrs,
}

impl fmt::Display for CidrList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CidrList::TrustedProxies => f.write_str("trusted_proxies"),
            CidrList::LocalCidrs => f.write_str("local_cidrs"),
        }
    }
}

/// Proxy and local-network definitions, as supplied by the deployment.
///
/// Each entry is a bare IP (`10.0.0.1`, `::1`) or CIDR (`10.0.0.0/8`).
/// Built once at startup and handed to
/// [`LocalClassifier::new`](crate::classifier::LocalClassifier::new).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Peers allowed to assert the client address via `X-Forwarded-For`.
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
    /// The local network. Empty means the built-in defaults.
    #[serde(default)]
    pub local_cidrs: Vec<String>,
}

impl TrustConfig {
    pub fn new(trusted_proxies: Vec<String>, local_cidrs: Vec<String>) -> Self {
        Self {
            trusted_proxies,
            local_cidrs,
        }
    }

    /// Load from `TRUSTED_PROXIES` and `LOCAL_CIDRS` (comma-separated).
    ///
    /// Malformed entries are logged and kept; the classifier skips them. With
    /// `NETGUARD_STRICT_CONFIG=true` the first malformed entry is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            trusted_proxies: list_from_env(TRUSTED_PROXIES_VAR),
            local_cidrs: list_from_env(LOCAL_CIDRS_VAR),
        };

        let strict = env::var(STRICT_CONFIG_VAR)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let skipped = config.validate();
        if let Some((list, first)) = skipped.first() {
            if strict {
                return Err(ConfigError::InvalidEntry {
                    list: *list,
                    entry: first.entry.clone(),
                    source: first.error.clone(),
                });
            }
            for (list, skip) in &skipped {
                tracing::warn!(
                    list = %list,
                    index = skip.index,
                    entry = %skip.entry,
                    error = %skip.error,
                    "ignoring malformed CIDR entry"
                );
            }
        }

        if config.trusted_proxies.is_empty() {
            tracing::info!("{TRUSTED_PROXIES_VAR} not set, X-Forwarded-For will be ignored");
        }

        Ok(config)
    }

    /// Every entry that would be skipped during matching, tagged by list.
    pub fn validate(&self) -> Vec<(CidrList, SkippedEntry)> {
        LocalClassifier::new(self).skipped_entries()
    }
}

/// Split a comma-separated env var, trimming and dropping empties.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn list_from_env(var: &str) -> Vec<String> {
    env::var(var).map(|v| parse_list(&v)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CidrParseError;

    #[test]
    fn parse_list_trims_and_drops_empties() {
        assert_eq!(
            parse_list(" 10.0.0.0/8, ,::1 ,,192.168.0.0/16"),
            vec!["10.0.0.0/8", "::1", "192.168.0.0/16"]
        );
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn validate_reports_both_lists() {
        let config = TrustConfig::new(
            vec!["10.0.0.0/8".into(), "10.0.0.0/40".into()],
            vec!["nope".into(), "::1".into()],
        );
        let skipped = config.validate();
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].0, CidrList::TrustedProxies);
        assert_eq!(skipped[0].1.entry, "10.0.0.0/40");
        assert_eq!(skipped[1].0, CidrList::LocalCidrs);
        assert_eq!(
            skipped[1].1.error,
            CidrParseError::InvalidAddress("nope".into())
        );
    }

    #[test]
    fn validate_is_empty_for_good_config() {
        let config = TrustConfig::new(vec!["172.16.0.0/12".into()], vec![]);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn deserializes_with_missing_lists() {
        let config: TrustConfig =
            serde_json::from_str(r#"{"trusted_proxies":["127.0.0.1"]}"#).unwrap();
        assert_eq!(config.trusted_proxies, vec!["127.0.0.1"]);
        assert!(config.local_cidrs.is_empty());
    }

    #[test]
    fn config_error_names_the_list() {
        let err = ConfigError::InvalidEntry {
            list: CidrList::LocalCidrs,
            entry: "x".into(),
            source: CidrParseError::InvalidAddress("x".into()),
        };
        assert_eq!(
            err.to_string(),
            "invalid local_cidrs entry \"x\": invalid address: x"
        );
    }
}
