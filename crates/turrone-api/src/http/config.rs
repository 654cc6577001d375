//! Configuration creation and update endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::http::API_ROOT;
use crate::http::errors::{ConfigAction, config_error_response};
use crate::models::ConfigResponse;
use crate::state::ApiState;

/// `<host><path>` of the config endpoint, as seen by the requesting client.
fn see_target(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    format!("{host}{API_ROOT}/config")
}

/// `POST /config`: create the configuration from a full document.
pub(crate) async fn create_config(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match state.config.create(&body).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(ConfigResponse::success("Config file created successfully")),
        )
            .into_response(),
        Err(err) => config_error_response(ConfigAction::Create, &see_target(&headers), err),
    }
}

/// `PATCH /config`: apply a replace-only PATCH document to the
/// configuration.
pub(crate) async fn update_config(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match state.config.update(&body).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ConfigResponse::success("Config file updated successfully")),
        )
            .into_response(),
        Err(err) => config_error_response(ConfigAction::Update, &see_target(&headers), err),
    }
}
