use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::metrics::{render, TEXT_CONTENT_TYPE};
use crate::security::bearer_matches;
use crate::state::AppState;

/// GET /health - Health check endpoint
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let classifier = &state.classifier;
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "netguard-echo",
        "version": env!("CARGO_PKG_VERSION"),
        "trusted_proxies": classifier.trusted_proxies().ranges().len(),
        "local_ranges": classifier.local_ranges().ranges().len(),
        "default_local_ranges": classifier.using_default_local(),
        "skipped_entries": classifier.skipped_entries().len(),
    }))
}

/// GET /metrics - Prometheus scrape, behind `METRICS_TOKEN` when one is set
pub async fn metrics(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let authorized = state.config.metrics_token.as_deref().map_or(true, |token| {
        let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        bearer_matches(header, token)
    });
    if !authorized {
        tracing::debug!(peer = ?req.peer_addr(), "rejected /metrics scrape without valid token");
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "unauthorized",
            "message": "Valid Bearer token required for /metrics"
        }));
    }

    match render() {
        Ok(text) => HttpResponse::Ok().content_type(TEXT_CONTENT_TYPE).body(text),
        Err(e) => {
            tracing::error!(error = %e, "metrics encoding failed");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics));
}
