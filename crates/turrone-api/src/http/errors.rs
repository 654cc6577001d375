//! Mapping of configuration failures onto wire responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use turrone_config::ConfigError;

use crate::models::{ConfigResponse, ErrorDetail};

/// Which write path produced the failure; drives messages and `see` hints.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ConfigAction {
    Create,
    Update,
}

impl ConfigAction {
    const fn persistence_message(self) -> &'static str {
        match self {
            Self::Create => "Unable to create config file",
            Self::Update => "Unable to update config file",
        }
    }
}

/// Render a configuration failure as its contractual response.
///
/// `see_target` is the client-visible `<host><path>` of the config endpoint,
/// used to point conflicting requests at the verb they should have used.
pub(crate) fn config_error_response(
    action: ConfigAction,
    see_target: &str,
    err: ConfigError,
) -> Response {
    match err {
        ConfigError::AlreadyExists => (
            StatusCode::CONFLICT,
            Json(
                ConfigResponse::error("The config file already exists")
                    .with_see(format!("PATCH {see_target}")),
            ),
        )
            .into_response(),
        ConfigError::NotInitialized => (
            StatusCode::BAD_REQUEST,
            Json(
                ConfigResponse::error("The config file does not exist")
                    .with_see(format!("POST {see_target}")),
            ),
        )
            .into_response(),
        ConfigError::Validation(violation) => (
            StatusCode::BAD_REQUEST,
            Json(
                ConfigResponse::error("Invalid request data")
                    .with_error(ErrorDetail::Schema(violation)),
            ),
        )
            .into_response(),
        ConfigError::PatchValidation(violation) => (
            StatusCode::BAD_REQUEST,
            Json(
                ConfigResponse::error("Invalid PATCH data")
                    .with_error(ErrorDetail::Schema(violation)),
            ),
        )
            .into_response(),
        ConfigError::Persistence(failure) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(
                ConfigResponse::error(action.persistence_message())
                    .with_error(ErrorDetail::Persistence(failure)),
            ),
        )
            .into_response(),
        // Only reachable when the artifact changes underneath a request.
        ConfigError::NotFound { path } | ConfigError::Malformed { path, .. } => {
            error!(path = %path.display(), "configuration artifact unreadable mid-request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConfigResponse::error(action.persistence_message())),
            )
                .into_response()
        }
    }
}
