use thiserror::Error;

use crate::config::CidrList;

/// Errors returned when parsing an `address` or `address/prefix` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrParseError {
    #[error("empty CIDR entry")]
    EmptyInput,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid prefix length: {0}")]
    InvalidPrefix(String),

    #[error("prefix length {prefix} exceeds {max} bits for this address family")]
    PrefixOutOfRange { prefix: u32, max: u8 },
}

/// Errors returned while loading trust configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {list} entry {entry:?}: {source}")]
    InvalidEntry {
        list: CidrList,
        entry: String,
        #[source]
        source: CidrParseError,
    },
}
