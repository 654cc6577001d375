//! Environment loading and service wiring for the server binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use turrone_api::ApiServer;
use turrone_config::{ConfigService, ConfigStore};
use turrone_events::{Event, EventBus, StatusRegistry};
use turrone_telemetry::{LoggingConfig, init_logging};

use crate::error::{AppError, AppResult};

/// Environment variable selecting the configuration environment scope.
const ENV_ENVIRONMENT: &str = "TURRONE_ENV";
/// Environment variable overriding the listen port.
const ENV_PORT: &str = "PORT";
const DEFAULT_PORT: u16 = 8080;

/// Status message published while no configuration has been created.
const SETUP_CONFIG_MESSAGE: &str =
    "There is no configuration file created to connect to the database";
const SETUP_CONFIG_CATEGORY: &str = "setup.config";

/// Dependencies required to bootstrap the Turrone server.
pub(crate) struct BootstrapDependencies {
    logging: LoggingConfig<'static>,
    root: PathBuf,
    environment: Option<String>,
    port: u16,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary
    /// entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let root = std::env::current_dir().map_err(|err| AppError::InvalidEnv {
            name: "PWD",
            detail: err.to_string(),
        })?;
        let environment = std::env::var(ENV_ENVIRONMENT).ok().filter(|env| !env.is_empty());
        let port = match std::env::var(ENV_PORT) {
            Ok(raw) => raw.parse().map_err(|_| AppError::InvalidEnv {
                name: ENV_PORT,
                detail: format!("not a TCP port: {raw}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            logging: LoggingConfig::default(),
            root,
            environment,
            port,
        })
    }
}

/// Entry point for the Turrone server boot sequence.
///
/// # Errors
///
/// Returns an error if dependency construction, telemetry initialisation, or
/// server startup fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify
/// testing.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    init_logging(&dependencies.logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!("Turrone server bootstrap starting");

    let events = EventBus::new();
    let status = StatusRegistry::new();
    let status_listener = status.attach(&events);

    let store = ConfigStore::new(&dependencies.root, dependencies.environment.as_deref());
    publish_setup_state(&events, &store).await;

    let service = ConfigService::new(store, events.clone());
    let server = ApiServer::new(Arc::new(service), status.clone());

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), dependencies.port);
    let result = server
        .serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err));

    status_listener.abort();
    result
}

/// Seed the API component status from the presence of the configuration
/// artifact.
async fn publish_setup_state(events: &EventBus, store: &ConfigStore) {
    if store.exists().await {
        events.publish(Event::ApiOperational);
    } else {
        warn!(path = %store.path().display(), "no configuration artifact; setup required");
        events.publish(Event::ApiError {
            message: SETUP_CONFIG_MESSAGE.to_string(),
            category: SETUP_CONFIG_CATEGORY.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use turrone_events::Status;

    async fn seeded_registry(root: &TempDir) -> StatusRegistry {
        let events = EventBus::new();
        let registry = StatusRegistry::new();
        let mut stream = events.subscribe();

        let store = ConfigStore::new(root.path(), None);
        publish_setup_state(&events, &store).await;
        registry.apply(&stream.next().await.expect("setup event"));
        registry
    }

    #[tokio::test]
    async fn missing_artifact_reports_setup_error() {
        let root = TempDir::new().expect("temp dir");
        let api = seeded_registry(&root).await.snapshot().api;

        assert_eq!(api.status, Status::Error);
        assert_eq!(api.message, SETUP_CONFIG_MESSAGE);
        assert_eq!(api.category, SETUP_CONFIG_CATEGORY);
    }

    #[tokio::test]
    async fn existing_artifact_reports_operational() {
        let root = TempDir::new().expect("temp dir");
        let config_dir = root.path().join("config");
        std::fs::create_dir_all(&config_dir).expect("mkdir");
        std::fs::write(
            config_dir.join("local.json"),
            r#"{"dbConfig":{"host":"localhost","port":27017,"database":"turrone"}}"#,
        )
        .expect("write");

        let api = seeded_registry(&root).await.snapshot().api;
        assert_eq!(api.status, Status::Operational);
        assert_eq!(api.message, "");
    }
}
