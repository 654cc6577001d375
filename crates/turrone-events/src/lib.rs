#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Event bus and component status registry for Turrone Server.
//!
//! The bus carries the four server-status signals between subsystems over a
//! `tokio::broadcast` channel. The [`StatusRegistry`] is the read side: it
//! consumes those signals and keeps one mutex-guarded [`ComponentStatus`]
//! record per tracked component for the status endpoint to snapshot. Both are
//! plain constructible values passed through dependency injection, so tests
//! can run isolated instances.

pub mod status;

use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};

pub use status::{Component, ComponentStatus, Status, StatusRegistry, StatusSnapshot};

/// Buffer size for the broadcast channel; status signals are tiny and rare.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Error shape exposed by the database driver's connection lifecycle.
///
/// Only the reporting surface of the driver is consumed here: `name` becomes
/// the status `category` and `message` the status `message`, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DriverError {
    /// Driver-assigned error class, e.g. `MongoNetworkError`.
    pub name: String,
    /// Human-readable failure description.
    pub message: String,
}

/// Typed status signals surfaced across the system.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// There has been an error with the API endpoints.
    ApiError {
        /// Reason for the error state.
        message: String,
        /// Classification tag for the message, e.g. `setup.config`.
        category: String,
    },
    /// The API endpoints are ready to serve requests.
    ApiOperational,
    /// There has been an error with the database.
    DatabaseError {
        /// Driver-provided failure description.
        message: String,
        /// Driver-provided error class.
        category: String,
    },
    /// The connection to the database is operational.
    DatabaseOperational,
}

impl Event {
    /// Machine-friendly discriminator naming the signal.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ApiError { .. } => "api.error",
            Self::ApiOperational => "api.operational",
            Self::DatabaseError { .. } => "database.error",
            Self::DatabaseOperational => "database.operational",
        }
    }

    /// Build a database error signal from the driver's native error shape.
    #[must_use]
    pub fn database_error(error: DriverError) -> Self {
        Self::DatabaseError {
            message: error.message,
            category: error.name,
        }
    }
}

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Sender<Event>,
}

impl EventBus {
    /// Construct a new bus with the provided broadcast capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "event bus capacity must be positive");
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Construct a bus with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Publish a signal to all current subscribers.
    ///
    /// Publishing never fails; a bus with no subscribers simply drops the
    /// event, matching fire-and-forget notification semantics.
    pub fn publish(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to signals published after this call.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper yielding events from the live broadcast channel.
#[derive(Debug)]
pub struct EventStream {
    receiver: Receiver<Event>,
}

impl EventStream {
    /// Receive the next event, skipping over any lagged gap.
    pub async fn next(&mut self) -> Option<Event> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => self.receiver.recv().await.ok(),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_subscribers_in_order() {
        let bus = EventBus::with_capacity(8);
        let mut stream = bus.subscribe();

        bus.publish(Event::ApiOperational);
        bus.publish(Event::ApiError {
            message: "boom".to_string(),
            category: "setup.config".to_string(),
        });

        assert_eq!(stream.next().await, Some(Event::ApiOperational));
        let second = stream.next().await.expect("second event");
        assert_eq!(second.kind(), "api.error");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::DatabaseOperational);
    }

    #[test]
    fn driver_error_maps_name_to_category() {
        let event = Event::database_error(DriverError {
            name: "MongoNetworkError".to_string(),
            message: "failed to connect".to_string(),
        });
        assert_eq!(
            event,
            Event::DatabaseError {
                message: "failed to connect".to_string(),
                category: "MongoNetworkError".to_string(),
            }
        );
    }
}
