mod catalog;
mod config;
mod cv;
mod dashboard;
mod errors;
mod gateway;
mod home;
mod listing;
mod models;
mod partials;
mod routes;
mod state;
mod views;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::gateway::Gateway;
use crate::listing::session::SessionRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentBridge portal v{}", env!("CARGO_PKG_VERSION"));

    let gateway = Gateway::new(
        &config.api_base_url,
        Duration::from_secs(config.http_timeout_secs),
    );
    info!("Backend gateway initialized ({})", config.api_base_url);

    let catalog = Catalog::load(&gateway, config.catalog_limit).await;
    let loaded = catalog.data().await;
    match &loaded.load_error {
        None => info!(
            "Job catalog loaded: {} records ({} reported by backend)",
            loaded.records.len(),
            loaded.reported_total
        ),
        Some(e) => warn!("Starting with an empty job catalog: {e}"),
    }

    let session_idle = Duration::from_secs(config.session_idle_secs);
    let sessions = SessionRegistry::new(session_idle);
    tokio::spawn(sessions.clone().sweep_every(session_idle / 2));
    info!("Listing sessions expire after {}s idle", config.session_idle_secs);

    let state = AppState {
        applications: Arc::new(gateway.clone()),
        gateway,
        catalog,
        sessions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
