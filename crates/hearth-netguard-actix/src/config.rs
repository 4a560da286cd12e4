use netguard::{ConfigError, TrustConfig};
use std::env;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4080;

#[derive(Clone)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind_addr: String,
    /// Server port
    pub port: u16,
    /// Trusted proxies and local network ranges
    pub trust: TrustConfig,
    /// Admit non-local requests at gated routes (development only)
    pub dev_allow_all: bool,
    /// Bearer token required for /metrics endpoint (None = public)
    pub metrics_token: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("trust", &self.trust)
            .field("dev_allow_all", &self.dev_allow_all)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerConfigError> {
        let trust = TrustConfig::from_env()?;

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ServerConfigError::InvalidPort(raw.clone()))?,
            Err(_) => DEFAULT_PORT,
        };

        let dev_allow_all = env::var("NETGUARD_DEV_ALLOW_ALL")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let metrics_token = env::var("METRICS_TOKEN").ok().filter(|s| !s.is_empty());

        if dev_allow_all {
            tracing::warn!(
                "NETGUARD_DEV_ALLOW_ALL=true: local-only routes accept requests from ANY address. \
                 DO NOT use this in production!"
            );
        }

        if metrics_token.is_none() {
            tracing::warn!("METRICS_TOKEN not set, /metrics endpoint is publicly accessible");
        }

        Ok(Self {
            bind_addr,
            port,
            trust,
            dev_allow_all,
            metrics_token,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error(transparent)]
    Trust(#[from] ConfigError),

    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_metrics_token() {
        let config = ServerConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            trust: TrustConfig::default(),
            dev_allow_all: false,
            metrics_token: Some("super-secret".to_string()),
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn invalid_port_message() {
        let err = ServerConfigError::InvalidPort("http".into());
        assert_eq!(err.to_string(), "invalid PORT: http");
    }
}
