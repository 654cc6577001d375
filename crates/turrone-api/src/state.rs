//! Shared dependencies wired through Axum application state.

use std::sync::Arc;

use turrone_config::ConfigService;
use turrone_events::StatusRegistry;

/// Dependencies every handler can reach through `State`.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Configuration create/update facade.
    pub config: Arc<ConfigService>,
    /// Component health registry backing the status endpoint.
    pub status: StatusRegistry,
}

impl ApiState {
    /// Bundle the service and registry for router construction.
    #[must_use]
    pub const fn new(config: Arc<ConfigService>, status: StatusRegistry) -> Self {
        Self { config, status }
    }
}
