use netguard::Classification;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static CLASSIFICATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "netguard_classifications_total",
            "Requests classified, by client source and locality",
        ),
        &["source", "local"],
    )
    .unwrap()
});

pub static GATE_DENIALS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "netguard_gate_denials_total",
        "Requests rejected by the local-network gate",
    )
    .unwrap()
});

pub static GATE_DEV_OVERRIDES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "netguard_gate_dev_overrides_total",
        "Non-local requests let through by the development override",
    )
    .unwrap()
});

pub static SKIPPED_CONFIG_ENTRIES: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "netguard_skipped_config_entries",
        "Malformed trusted-proxy or local CIDR entries being ignored",
    )
    .unwrap()
});

static REGISTER: Once = Once::new();

/// Register all metrics with the registry. Safe to call more than once.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(CLASSIFICATIONS_TOTAL.clone()))
            .unwrap();
        REGISTRY.register(Box::new(GATE_DENIALS.clone())).unwrap();
        REGISTRY
            .register(Box::new(GATE_DEV_OVERRIDES.clone()))
            .unwrap();
        REGISTRY
            .register(Box::new(SKIPPED_CONFIG_ENTRIES.clone()))
            .unwrap();
    });
}

pub fn record_classification(classification: &Classification) {
    let local = if classification.is_local {
        "true"
    } else {
        "false"
    };
    CLASSIFICATIONS_TOTAL
        .with_label_values(&[classification.source.as_str(), local])
        .inc();
}

/// Content type of the Prometheus text exposition format.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Encode every registered metric in the text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netguard::ClientSource;

    #[test]
    fn register_is_idempotent() {
        register_metrics();
        register_metrics();
        let text = render().unwrap();
        assert_eq!(text.matches("# TYPE netguard_gate_denials_total").count(), 1);
        assert!(text.contains("netguard_skipped_config_entries"));
    }

    #[test]
    fn classification_is_counted_by_labels() {
        let classification = Classification {
            client_ip: None,
            source: ClientSource::Unknown,
            is_local: false,
        };
        let counter = CLASSIFICATIONS_TOTAL.with_label_values(&["unknown", "false"]);
        let before = counter.get();
        record_classification(&classification);
        assert_eq!(counter.get(), before + 1);
    }
}
