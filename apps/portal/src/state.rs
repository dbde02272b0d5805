use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::gateway::{ApplicationSource, Gateway};
use crate::listing::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    /// Application history source for the dashboard fan-out. Defaults to the gateway.
    pub applications: Arc<dyn ApplicationSource>,
    pub catalog: Catalog,
    pub sessions: SessionRegistry,
    pub config: Config,
}
