//! Typed configuration document persisted to disk.

use serde::{Deserialize, Serialize};

/// The persisted configuration record, `{"dbConfig": {...}}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Database connection settings.
    #[serde(rename = "dbConfig")]
    pub db_config: DbConfig,
}

/// Database connection settings.
///
/// Field order matters: serialization must reproduce the artifact layout the
/// original server wrote, with optional fields omitted entirely when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Hostname of the database server.
    pub host: String,
    /// TCP port of the database server, 1-65535.
    pub port: u16,
    /// Name of the database, 1-63 characters.
    pub database: String,
    /// Optional login user, alphanumeric only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Optional login password, unconstrained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_from_the_artifact() {
        let config = Configuration {
            db_config: DbConfig {
                host: "localhost".to_string(),
                port: 27017,
                database: "turrone".to_string(),
                username: None,
                password: None,
            },
        };

        let json = serde_json::to_string(&config).expect("serializes");
        assert_eq!(
            json,
            r#"{"dbConfig":{"host":"localhost","port":27017,"database":"turrone"}}"#
        );
    }

    #[test]
    fn full_document_round_trips() {
        let json = r#"{"dbConfig":{"host":"localhost","port":27017,"database":"turrone","username":"TurroneDatabaseUser","password":"My5up3rS3cur3P@ssw0rd!"}}"#;
        let config: Configuration = serde_json::from_str(json).expect("deserializes");
        assert_eq!(config.db_config.port, 27017);
        assert_eq!(serde_json::to_string(&config).expect("serializes"), json);
    }
}
