use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netguard_actix::{config::ServerConfig, metrics::register_metrics, routes, state::AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    register_metrics();

    let state = AppState::new(config);

    tracing::info!("Starting netguard-echo on {}:{}", bind_addr, port);
    tracing::info!(
        "Trusted proxies: {}",
        state.classifier.trusted_proxies().ranges().len()
    );
    tracing::info!(
        "Local ranges: {}{}",
        state.classifier.local_ranges().ranges().len(),
        if state.classifier.using_default_local() {
            " (defaults)"
        } else {
            ""
        }
    );

    let classifier_data = state.classifier_data();
    let state_data = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .app_data(classifier_data.clone())
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((bind_addr.as_str(), port))?
    .run()
    .await
}
