//! Per-component health records backing the status endpoint.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{Event, EventBus};

/// The different states that a component can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// There is currently an issue with this component.
    Error,
    /// This component is currently starting.
    Initializing,
    /// The component is ready to serve requests.
    Operational,
}

impl Status {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Initializing => "initializing",
            Self::Operational => "operational",
        }
    }
}

/// The named subsystems whose health is tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// The API endpoint component.
    Api,
    /// The database component.
    Database,
}

impl Component {
    /// Wire name of the component.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Database => "database",
        }
    }
}

/// Snapshot of a single component's health.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComponentStatus {
    /// The current status of the component.
    pub status: Status,
    /// A message describing the reason for the current component status.
    pub message: String,
    /// The category of the message.
    pub category: String,
    /// UNIX timestamp in milliseconds of when this record last changed.
    pub updated: i64,
}

impl ComponentStatus {
    fn initializing() -> Self {
        Self {
            status: Status::Initializing,
            message: String::new(),
            category: String::new(),
            updated: Utc::now().timestamp_millis(),
        }
    }
}

/// Copy of the full registry state handed to readers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusSnapshot {
    /// The API endpoint component.
    pub api: ComponentStatus,
    /// The database component.
    pub database: ComponentStatus,
}

/// Process-wide component health registry.
///
/// Each record lives behind its own mutex so `report` and `snapshot` can
/// interleave arbitrarily across threads. Records exist for the lifetime of
/// the registry; there is no removal.
#[derive(Debug, Clone)]
pub struct StatusRegistry {
    api: Arc<Mutex<ComponentStatus>>,
    database: Arc<Mutex<ComponentStatus>>,
}

impl StatusRegistry {
    /// Construct a registry with both components in the `initializing` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api: Arc::new(Mutex::new(ComponentStatus::initializing())),
            database: Arc::new(Mutex::new(ComponentStatus::initializing())),
        }
    }

    /// Overwrite the named component's record and stamp the transition time.
    ///
    /// Repeated identical reports simply refresh the timestamp.
    ///
    /// # Panics
    ///
    /// Panics if the component's status mutex has been poisoned.
    pub fn report(&self, component: Component, status: Status, message: &str, category: &str) {
        let record = match component {
            Component::Api => &self.api,
            Component::Database => &self.database,
        };
        let mut guard = record.lock().expect("component status mutex poisoned");
        guard.status = status;
        guard.message = message.to_string();
        guard.category = category.to_string();
        guard.updated = Utc::now().timestamp_millis();
    }

    /// Apply one status signal to the registry.
    pub fn apply(&self, event: &Event) {
        match event {
            Event::ApiError { message, category } => {
                self.report(Component::Api, Status::Error, message, category);
            }
            Event::ApiOperational => {
                self.report(Component::Api, Status::Operational, "", "");
            }
            Event::DatabaseError { message, category } => {
                self.report(Component::Database, Status::Error, message, category);
            }
            Event::DatabaseOperational => {
                self.report(Component::Database, Status::Operational, "", "");
            }
        }
    }

    /// Spawn a listener task that applies every bus signal to this registry.
    pub fn attach(&self, bus: &EventBus) -> JoinHandle<()> {
        let registry = self.clone();
        let mut stream = bus.subscribe();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                debug!(signal = event.kind(), "applying status signal");
                registry.apply(&event);
            }
        })
    }

    /// Copy the current state of both tracked components.
    ///
    /// # Panics
    ///
    /// Panics if a component's status mutex has been poisoned.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            api: self
                .api
                .lock()
                .expect("component status mutex poisoned")
                .clone(),
            database: self
                .database
                .lock()
                .expect("component status mutex poisoned")
                .clone(),
        }
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}
