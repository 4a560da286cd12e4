//! actix-web integration for [`netguard`].
//!
//! Feeds the socket peer address and `X-Forwarded-For` header of each request
//! into a shared [`LocalClassifier`](netguard::LocalClassifier) and gates
//! routes that must only be reachable from the local network.
//!
//! # Modules
//!
//! - [`extract`]: request inputs and the [`ClientClassification`](extract::ClientClassification) extractor
//! - [`gate`]: local-only gate ([`require_local`](gate::require_local))
//! - [`config`]: server configuration from the environment
//! - [`metrics`]: Prometheus counters for classifications and gate decisions
//! - [`routes`]: `/health`, `/metrics`, `/whoami`, `/local/status`

pub mod config;
pub mod extract;
pub mod gate;
pub mod metrics;
pub mod routes;
pub mod security;
pub mod state;

pub use config::{ServerConfig, ServerConfigError};
pub use extract::{request_inputs, ClientClassification, RequestInputs};
pub use gate::{require_local, LocalGate};
pub use state::AppState;
