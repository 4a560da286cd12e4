use actix_web::{HttpRequest, HttpResponse};
use netguard::{Classification, LocalClassifier};

use crate::extract::request_inputs;
use crate::metrics::{record_classification, GATE_DENIALS, GATE_DEV_OVERRIDES};

/// Policy for routes restricted to the local network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalGate {
    /// Let every request through while still classifying it. Development only.
    pub dev_allow_all: bool,
}

impl LocalGate {
    pub fn strict() -> Self {
        Self {
            dev_allow_all: false,
        }
    }
}

/// Admit only requests classified as local.
///
/// Returns the classification on success, or a ready 403 response to send.
/// The development override is applied here, on top of the classifier's
/// answer; the classification itself is never altered.
pub fn require_local(
    req: &HttpRequest,
    classifier: &LocalClassifier,
    gate: &LocalGate,
) -> Result<Classification, HttpResponse> {
    let classification = request_inputs(req).classify(classifier);
    record_classification(&classification);

    if classification.is_local {
        tracing::debug!(
            client_ip = ?classification.client_ip,
            source = %classification.source,
            path = %req.path(),
            "local request admitted"
        );
        return Ok(classification);
    }

    if gate.dev_allow_all {
        GATE_DEV_OVERRIDES.inc();
        tracing::warn!(
            client_ip = ?classification.client_ip,
            source = %classification.source,
            path = %req.path(),
            "non-local request admitted by development override"
        );
        return Ok(classification);
    }

    GATE_DENIALS.inc();
    tracing::warn!(
        client_ip = ?classification.client_ip,
        source = %classification.source,
        path = %req.path(),
        "non-local request rejected"
    );

    Err(HttpResponse::Forbidden().json(serde_json::json!({
        "error": "local_network_required",
        "message": "This action is only available from the local network"
    })))
}
