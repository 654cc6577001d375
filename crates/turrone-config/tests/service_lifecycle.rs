//! End-to-end lifecycle of the configuration artifact through the service.

use serde_json::json;
use tempfile::TempDir;
use turrone_config::{ConfigError, ConfigService, ConfigStore};
use turrone_events::EventBus;

fn service_for(root: &TempDir, environment: Option<&str>) -> ConfigService {
    ConfigService::new(ConfigStore::new(root.path(), environment), EventBus::new())
}

#[tokio::test]
async fn create_patch_reload_cycle_preserves_untouched_fields() {
    let root = TempDir::new().expect("temp dir");
    let service = service_for(&root, None);

    service
        .create(&json!({
            "dbConfig": {
                "host": "localhost",
                "port": 27017,
                "database": "turrone",
                "username": "TurroneDatabaseUser",
                "password": "My5up3rS3cur3P@ssw0rd!",
            }
        }))
        .await
        .expect("create");

    service
        .update(&json!([
            {"op": "replace", "path": "/dbConfig/host", "value": "db.example.com"},
            {"op": "replace", "path": "/dbConfig/port", "value": 54321},
            {"op": "replace", "path": "/dbConfig/database", "value": "turrone2"},
            {"op": "replace", "path": "/dbConfig/username", "value": "NewUser"},
        ]))
        .await
        .expect("update");

    let reloaded = service.store().load().await.expect("reload");
    assert_eq!(reloaded.db_config.host, "db.example.com");
    assert_eq!(reloaded.db_config.port, 54321);
    assert_eq!(reloaded.db_config.database, "turrone2");
    assert_eq!(reloaded.db_config.username.as_deref(), Some("NewUser"));
    assert_eq!(
        reloaded.db_config.password.as_deref(),
        Some("My5up3rS3cur3P@ssw0rd!")
    );
}

#[tokio::test]
async fn repeated_operations_on_the_same_field_apply_in_order() {
    let root = TempDir::new().expect("temp dir");
    let service = service_for(&root, None);

    service
        .create(&json!({
            "dbConfig": {"host": "localhost", "port": 27017, "database": "turrone"}
        }))
        .await
        .expect("create");

    service
        .update(&json!([
            {"op": "replace", "path": "/dbConfig/host", "value": "first.example"},
            {"op": "replace", "path": "/dbConfig/host", "value": "second.example"},
        ]))
        .await
        .expect("update");

    let reloaded = service.store().load().await.expect("reload");
    assert_eq!(reloaded.db_config.host, "second.example");
}

#[tokio::test]
async fn rejected_update_leaves_no_artifact_behind() {
    let root = TempDir::new().expect("temp dir");
    let service = service_for(&root, None);

    let err = service
        .update(&json!([
            {"op": "replace", "path": "/dbConfig/host", "value": "localhost"}
        ]))
        .await
        .expect_err("nothing was created");
    assert!(matches!(err, ConfigError::NotInitialized));
    assert!(!service.store().path().exists());
}

#[tokio::test]
async fn environments_are_isolated_from_each_other() {
    let root = TempDir::new().expect("temp dir");
    let default = service_for(&root, None);
    let test = service_for(&root, Some("test"));

    default
        .create(&json!({
            "dbConfig": {"host": "localhost", "port": 27017, "database": "turrone"}
        }))
        .await
        .expect("create default");

    assert!(default.store().exists().await);
    assert!(!test.store().exists().await);

    test.create(&json!({
        "dbConfig": {"host": "localhost", "port": 27018, "database": "turrone-test"}
    }))
    .await
    .expect("create test");

    let default_config = default.store().load().await.expect("load default");
    let test_config = test.store().load().await.expect("load test");
    assert_eq!(default_config.db_config.port, 27017);
    assert_eq!(test_config.db_config.port, 27018);
}
