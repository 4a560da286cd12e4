pub mod client;
pub mod health;

use actix_web::web;

/// Mount every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure(cfg);
    client::configure(cfg);
}
