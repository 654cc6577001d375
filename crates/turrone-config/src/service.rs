//! Create/update state machine over the on-disk artifact.
//!
//! # Design
//!
//! `ConfigService` owns the only write path to the artifact. Creation runs
//! the full schema over the submitted document; updates validate the PATCH
//! document structurally, merge it over the current artifact, then run the
//! merged candidate through the same creation schema before anything is
//! written. Successful writes publish an API-operational event so status
//! consumers see the server leave its setup state.

use serde_json::Value;
use tracing::{info, instrument, warn};
use turrone_events::{Event, EventBus};

use crate::error::{ConfigError, ConfigResult};
use crate::model::Configuration;
use crate::patch::apply_patch;
use crate::schema::{parse_config, validate_patch_document};
use crate::store::ConfigStore;

/// Validating facade over the configuration store.
#[derive(Debug, Clone)]
pub struct ConfigService {
    store: ConfigStore,
    events: EventBus,
}

impl ConfigService {
    /// Build a service over the given store, publishing onto `events`.
    #[must_use]
    pub const fn new(store: ConfigStore, events: EventBus) -> Self {
        Self { store, events }
    }

    /// Store backing this service.
    #[must_use]
    pub const fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Create the configuration from a full document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyExists`] when a configuration was
    /// already created, [`ConfigError::Validation`] when the document fails
    /// the creation schema, and [`ConfigError::Persistence`] when the write
    /// fails.
    #[instrument(name = "config.create", skip_all)]
    pub async fn create(&self, body: &Value) -> ConfigResult<Configuration> {
        if self.store.exists().await {
            return Err(ConfigError::AlreadyExists);
        }

        let config = parse_config(body).map_err(ConfigError::Validation)?;
        self.store.save(&config).await?;

        info!(path = %self.store.path().display(), "configuration created");
        self.events.publish(Event::ApiOperational);
        Ok(config)
    }

    /// Update the configuration from a PATCH document.
    ///
    /// Operations are merged over the current artifact in document order and
    /// the merged candidate is re-validated in full; nothing is written when
    /// any stage fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotInitialized`] when no configuration was
    /// created yet, [`ConfigError::PatchValidation`] for a structurally
    /// invalid PATCH document, [`ConfigError::Validation`] when the merged
    /// candidate fails the creation schema, and [`ConfigError::Persistence`]
    /// when the write fails.
    #[instrument(name = "config.update", skip_all)]
    pub async fn update(&self, body: &Value) -> ConfigResult<Configuration> {
        if !self.store.exists().await {
            return Err(ConfigError::NotInitialized);
        }

        let operations = validate_patch_document(body).map_err(ConfigError::PatchValidation)?;
        let current = self.store.load_value().await?;
        let merged = apply_patch(&current, &operations);
        let config = parse_config(&merged).map_err(|violation| {
            warn!(path = %violation.path, "merged configuration rejected");
            ConfigError::Validation(violation)
        })?;

        self.store.save(&config).await?;

        info!(path = %self.store.path().display(), "configuration updated");
        self.events.publish(Event::ApiOperational);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn service(root: &TempDir) -> ConfigService {
        ConfigService::new(ConfigStore::new(root.path(), None), EventBus::new())
    }

    fn valid_body() -> Value {
        json!({
            "dbConfig": {
                "host": "localhost",
                "port": 27017,
                "database": "turrone",
            }
        })
    }

    #[tokio::test]
    async fn create_rejects_a_second_document() {
        let root = TempDir::new().expect("temp dir");
        let service = service(&root);

        service.create(&valid_body()).await.expect("first create");
        let before = std::fs::read_to_string(service.store().path()).expect("read");

        let mut second = valid_body();
        second["dbConfig"]["host"] = json!("other.example");
        let err = service.create(&second).await.expect_err("second create");
        assert!(matches!(err, ConfigError::AlreadyExists));

        let after = std::fs::read_to_string(service.store().path()).expect("read");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn create_validation_failure_writes_nothing() {
        let root = TempDir::new().expect("temp dir");
        let service = service(&root);

        let err = service.create(&json!({})).await.expect_err("invalid body");
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(!service.store().path().exists());
    }

    #[tokio::test]
    async fn update_requires_a_created_configuration() {
        let root = TempDir::new().expect("temp dir");
        let service = service(&root);

        let patch = json!([{"op": "replace", "path": "/dbConfig/host", "value": "a"}]);
        let err = service.update(&patch).await.expect_err("nothing created");
        assert!(matches!(err, ConfigError::NotInitialized));
        assert!(!service.store().path().exists());
    }

    #[tokio::test]
    async fn update_merges_and_revalidates() {
        let root = TempDir::new().expect("temp dir");
        let service = service(&root);
        service.create(&valid_body()).await.expect("create");

        let patch = json!([
            {"op": "replace", "path": "/dbConfig/host", "value": "127.0.0.1"},
            {"op": "replace", "path": "/dbConfig/port", "value": 54321},
        ]);
        let config = service.update(&patch).await.expect("update");
        assert_eq!(config.db_config.host, "127.0.0.1");
        assert_eq!(config.db_config.port, 54321);
        assert_eq!(config.db_config.database, "turrone");
    }

    #[tokio::test]
    async fn update_rejects_a_merged_candidate_that_fails_the_schema() {
        let root = TempDir::new().expect("temp dir");
        let service = service(&root);
        service.create(&valid_body()).await.expect("create");
        let before = std::fs::read_to_string(service.store().path()).expect("read");

        // Structurally valid PATCH, semantically invalid merged result.
        let patch = json!([{"op": "replace", "path": "/dbConfig/port", "value": 0}]);
        let err = service.update(&patch).await.expect_err("port 0 is invalid");
        let ConfigError::Validation(violation) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            violation.details,
            r#""port" must be larger than or equal to 1"#
        );

        let after = std::fs::read_to_string(service.store().path()).expect("read");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn successful_writes_publish_an_operational_event() {
        let root = TempDir::new().expect("temp dir");
        let bus = EventBus::new();
        let mut stream = bus.subscribe();
        let service = ConfigService::new(ConfigStore::new(root.path(), None), bus);

        service.create(&valid_body()).await.expect("create");
        let event = stream.next().await.expect("event");
        assert_eq!(event.kind(), "api.operational");
    }
}
