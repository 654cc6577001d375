//! On-disk configuration artifact lifecycle.
//!
//! The artifact lives at `<root>/config/local.json`, or
//! `<root>/config/local-<environment>.json` when an environment name is set.
//! Writes go through a temp file in the same directory followed by a rename,
//! so readers never observe a partially written document.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, instrument};

use crate::error::{ConfigError, ConfigResult, PersistenceError};
use crate::model::Configuration;
use crate::pointer;

const CONFIG_DIR: &str = "config";
const TMP_SUFFIX: &str = ".tmp";

/// Placeholder values a freshly scaffolded artifact may carry; a document is
/// only considered created once all three identity fields differ from these.
const DEFAULT_HOST: &str = "";
const DEFAULT_DATABASE: &str = "";

/// File-backed store for the configuration artifact.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Build a store rooted at `root`, scoped to an optional environment.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, environment: Option<&str>) -> Self {
        let file_name = match environment {
            Some(env) if !env.is_empty() => format!("local-{env}.json"),
            _ => "local.json".to_string(),
        };
        Self {
            path: root.as_ref().join(CONFIG_DIR).join(file_name),
        }
    }

    /// Path of the configuration artifact this store manages.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a created configuration exists.
    ///
    /// A file that is missing, unparseable, or still carrying placeholder
    /// identity fields does not count as created.
    pub async fn exists(&self) -> bool {
        let Ok(raw) = fs::read_to_string(&self.path).await else {
            return false;
        };
        let Ok(doc) = serde_json::from_str::<Value>(&raw) else {
            return false;
        };
        has_identity(&doc)
    }

    /// Load the raw artifact document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the artifact is absent and
    /// [`ConfigError::Malformed`] when it cannot be parsed as JSON.
    pub async fn load_value(&self) -> ConfigResult<Value> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: self.path.clone(),
            })?;
        serde_json::from_str(&raw).map_err(|err| ConfigError::Malformed {
            path: self.path.clone(),
            detail: err.to_string(),
        })
    }

    /// Load the artifact as a typed configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::load_value`] failures; a document that parses as
    /// JSON but not as a configuration is reported as malformed.
    pub async fn load(&self) -> ConfigResult<Configuration> {
        let value = self.load_value().await?;
        serde_json::from_value(value).map_err(|err| ConfigError::Malformed {
            path: self.path.clone(),
            detail: err.to_string(),
        })
    }

    /// Persist the configuration atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Persistence`] carrying the native failure when
    /// the directory cannot be created or the write or rename fails.
    #[instrument(name = "config_store.save", skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, config: &Configuration) -> ConfigResult<()> {
        let serialized = serde_json::to_string(config).map_err(|err| ConfigError::Malformed {
            path: self.path.clone(),
            detail: err.to_string(),
        })?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|err| self.persistence_error(&err))?;
        }

        let tmp = self.path.with_extension(format!("json{TMP_SUFFIX}"));
        fs::write(&tmp, serialized.as_bytes())
            .await
            .map_err(|err| self.persistence_error(&err))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| self.persistence_error(&err))?;

        debug!("configuration artifact written");
        Ok(())
    }

    fn persistence_error(&self, err: &std::io::Error) -> ConfigError {
        let errno = err.raw_os_error().map_or(5, i64::from);
        let category = errno_name(errno).to_string();
        let path = self.path.display().to_string();
        let reason = strerror(errno);
        ConfigError::Persistence(PersistenceError {
            details: format!("{category}: {reason}, open '{path}'"),
            category,
            errno: -errno,
            path,
        })
    }
}

fn has_identity(doc: &Value) -> bool {
    let host = pointer::get(doc, "/dbConfig/host").and_then(Value::as_str);
    let port = pointer::get(doc, "/dbConfig/port").and_then(Value::as_i64);
    let database = pointer::get(doc, "/dbConfig/database").and_then(Value::as_str);

    match (host, port, database) {
        (Some(host), Some(port), Some(database)) => {
            host != DEFAULT_HOST && port > 0 && database != DEFAULT_DATABASE
        }
        _ => false,
    }
}

const fn errno_name(errno: i64) -> &'static str {
    match errno {
        1 => "EPERM",
        2 => "ENOENT",
        13 => "EACCES",
        17 => "EEXIST",
        20 => "ENOTDIR",
        21 => "EISDIR",
        28 => "ENOSPC",
        30 => "EROFS",
        _ => "EIO",
    }
}

const fn strerror(errno: i64) -> &'static str {
    match errno {
        1 => "operation not permitted",
        2 => "no such file or directory",
        13 => "permission denied",
        17 => "file already exists",
        20 => "not a directory",
        21 => "is a directory",
        28 => "no space left on device",
        30 => "read-only file system",
        _ => "i/o error",
    }
}
