use actix_web::{web, HttpRequest, HttpResponse};

use crate::extract::ClientClassification;
use crate::gate::require_local;
use crate::state::AppState;

/// GET /whoami - How this request was classified
pub async fn whoami(client: ClientClassification) -> HttpResponse {
    HttpResponse::Ok().json(client.into_inner())
}

/// GET /local/status - Reachable only from the local network
pub async fn local_status(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match require_local(&req, &state.classifier, &state.gate) {
        Ok(classification) => HttpResponse::Ok().json(serde_json::json!({
            "allowed": true,
            "client_ip": classification.client_ip,
            "source": classification.source,
            "is_local": classification.is_local,
        })),
        Err(resp) => resp,
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/whoami", web::get().to(whoami))
        .route("/local/status", web::get().to(local_status));
}
