//! Client IP classification for local-network gating.
//!
//! Decides, for one inbound request, which address is the real client and
//! whether that address lies inside the configured local network. Callers use
//! the answer to allow unauthenticated privileged actions (first-run setup,
//! LAN-only administration) only from trusted machines.
//!
//! # Pipeline
//!
//! - [`cidr`]: `address[/prefix]` parsing ([`parse_cidr`])
//! - [`addr`]: bracket stripping and IPv4-mapped demapping ([`normalize_ip`])
//! - [`matcher`]: bitwise prefix comparison
//! - [`set`]: ordered membership tests that skip malformed entries ([`contains_ip`])
//! - [`resolver`]: trusted-proxy `X-Forwarded-For` handling ([`resolve_client`])
//! - [`classifier`]: the facade ([`LocalClassifier`])
//!
//! Every step fails closed: missing, malformed or cross-family input is
//! never local and never trusted.
//!
//! # Example
//!
//! ```
//! use netguard::{ClientSource, LocalClassifier, TrustConfig};
//!
//! let config = TrustConfig::new(vec!["127.0.0.1".into()], vec![]);
//! let classifier = LocalClassifier::new(&config);
//!
//! // A request relayed by the local reverse proxy on behalf of a LAN client.
//! let result = classifier.classify(Some("127.0.0.1"), Some("192.168.1.50"));
//! assert_eq!(result.source, ClientSource::ForwardedFor);
//! assert!(result.is_local);
//!
//! // The same header from anyone else is ignored.
//! let result = classifier.classify(Some("203.0.113.5"), Some("192.168.1.50"));
//! assert_eq!(result.client_ip.as_deref(), Some("203.0.113.5"));
//! assert!(!result.is_local);
//! ```

pub mod addr;
pub mod cidr;
pub mod classifier;
pub mod config;
pub mod error;
pub mod matcher;
pub mod resolver;
pub mod set;

pub use addr::{demap, normalize_ip, strip_brackets};
pub use cidr::{parse_cidr, Cidr};
pub use classifier::{Classification, LocalClassifier, DEFAULT_LOCAL_CIDRS};
pub use config::{CidrList, TrustConfig};
pub use error::{CidrParseError, ConfigError};
pub use resolver::{resolve_client, ClientSource, ResolvedClient, TrustChain};
pub use set::{contains_ip, contains_ip_with, CidrSet, SkippedEntry};
