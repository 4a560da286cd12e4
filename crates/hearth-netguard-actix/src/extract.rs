use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{web, FromRequest, HttpRequest};
use netguard::{Classification, LocalClassifier};

use crate::metrics::record_classification;

/// Header consulted when the peer is a trusted proxy.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// The raw per-request inputs to [`LocalClassifier::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInputs {
    /// Transport peer IP, without port.
    pub peer: Option<String>,
    /// All `X-Forwarded-For` lines, joined with `", "` in arrival order.
    pub forwarded_for: Option<String>,
}

impl RequestInputs {
    pub fn classify(&self, classifier: &LocalClassifier) -> Classification {
        classifier.classify(self.peer.as_deref(), self.forwarded_for.as_deref())
    }
}

/// Collect the peer address and forwarded header from a request.
///
/// The peer comes from the socket, never from `Forwarded`/`X-Real-IP` or
/// actix's `realip_remote_addr`, which trust headers unconditionally.
pub fn request_inputs(req: &HttpRequest) -> RequestInputs {
    RequestInputs {
        peer: req.peer_addr().map(|addr| addr.ip().to_string()),
        forwarded_for: forwarded_for(req.headers()),
    }
}

/// Non-UTF-8 bytes are decoded lossily rather than dropped: a trusted proxy
/// sending garbage must yield a garbage (non-local) client, not fall back to
/// the proxy's own address.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let values: Vec<String> = headers
        .get_all(FORWARDED_FOR_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Extractor yielding the request's [`Classification`].
///
/// Requires `web::Data<LocalClassifier>` in app data.
#[derive(Debug, Clone)]
pub struct ClientClassification(pub Classification);

impl ClientClassification {
    pub fn into_inner(self) -> Classification {
        self.0
    }
}

impl Deref for ClientClassification {
    type Target = Classification;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for ClientClassification {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<LocalClassifier>>() {
            Some(classifier) => {
                let classification = request_inputs(req).classify(classifier);
                record_classification(&classification);
                Ok(ClientClassification(classification))
            }
            None => {
                tracing::error!("LocalClassifier is not registered as app data");
                Err(actix_web::error::ErrorInternalServerError(
                    "client classifier not configured",
                ))
            }
        };
        ready(result)
    }
}
