use std::sync::Arc;

use actix_web::web;
use netguard::LocalClassifier;

use crate::config::ServerConfig;
use crate::gate::LocalGate;
use crate::metrics::SKIPPED_CONFIG_ENTRIES;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub classifier: Arc<LocalClassifier>,
    pub gate: LocalGate,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let classifier = LocalClassifier::new(&config.trust);

        let skipped = classifier.skipped_entries().len();
        SKIPPED_CONFIG_ENTRIES.set(i64::try_from(skipped).unwrap_or(i64::MAX));

        let gate = LocalGate {
            dev_allow_all: config.dev_allow_all,
        };

        Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
            gate,
        }
    }

    /// The classifier as app data, for the [`ClientClassification`](crate::extract::ClientClassification) extractor.
    pub fn classifier_data(&self) -> web::Data<LocalClassifier> {
        web::Data::from(self.classifier.clone())
    }
}
