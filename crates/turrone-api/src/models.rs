//! Wire-format response envelopes.
//!
//! Field order and key counts are part of the contract: success and
//! redirect-style responses carry exactly `status` + `message` (+ `see`),
//! failure responses carry `status` + `message` + `error`.

use serde::Serialize;
use turrone_config::{PersistenceError, SchemaViolation};
use turrone_events::StatusSnapshot;

/// Envelope for every `config` endpoint response.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    /// `"success"` or `"error"`.
    pub status: &'static str,
    /// Human-readable outcome.
    pub message: String,
    /// Pointer to the endpoint the client should use instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub see: Option<String>,
    /// Structured failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl ConfigResponse {
    /// A plain success outcome.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            see: None,
            error: None,
        }
    }

    /// A plain error outcome.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            see: None,
            error: None,
        }
    }

    /// Attach a `see` hint naming the endpoint to use instead.
    #[must_use]
    pub fn with_see(mut self, see: impl Into<String>) -> Self {
        self.see = Some(see.into());
        self
    }

    /// Attach structured failure detail.
    #[must_use]
    pub fn with_error(mut self, error: ErrorDetail) -> Self {
        self.error = Some(error);
        self
    }
}

/// Structured detail attached to failed `config` responses.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// A schema validation failure: `details`, `category`, `path`.
    Schema(SchemaViolation),
    /// A storage failure: `details`, `category`, `errno`, `path`.
    Persistence(PersistenceError),
}

/// Body of the `ping` endpoint and of the unknown-route fallback.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// The only field either response carries.
    pub message: &'static str,
}

/// Body of the `status` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// The components making up the server.
    pub components: StatusSnapshot,
}
