//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, info};
use turrone_config::ConfigService;
use turrone_events::StatusRegistry;
use turrone_telemetry::{build_sha, propagate_request_id_layer, set_request_id_layer};

use crate::http::API_ROOT;
use crate::http::config::{create_config, update_config};
use crate::http::ping::ping;
use crate::http::status::status;
use crate::models::MessageResponse;
use crate::state::ApiState;

const HEADER_REQUEST_ID: &str = "x-request-id";

/// Axum router wrapper that hosts the Turrone server endpoints.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct a new API server with shared dependencies wired through
    /// application state.
    #[must_use]
    pub fn new(config: Arc<ConfigService>, status: StatusRegistry) -> Self {
        let state = ApiState::new(config, status);
        Self {
            router: build_router(state),
        }
    }

    /// The routing table, for in-process testing.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until the connection loop ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the accept loop
    /// fails.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "api listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

fn build_router(state: ApiState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(HEADER_REQUEST_ID)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("")
                .to_string();
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                route = %request.uri().path(),
                request_id = %request_id,
                build_sha = %build_sha(),
                status_code = tracing::field::Empty,
                latency_ms = tracing::field::Empty
            )
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &Span| {
                span.record("status_code", response.status().as_u16());
                span.record(
                    "latency_ms",
                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                );
            },
        );

    // Undeclared methods on declared paths share the unknown-route body,
    // not a bare 405.
    let endpoints = Router::new()
        .route("/ping", get(ping).fallback(unknown_route))
        .route("/status", get(status).fallback(unknown_route))
        .route(
            "/config",
            post(create_config)
                .patch(update_config)
                .fallback(unknown_route),
        );

    Router::new()
        .nest(API_ROOT, endpoints)
        .fallback(unknown_route)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(trace_layer)
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}

/// Fixed body for every unmatched route, regardless of method.
async fn unknown_route() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse {
            message: "Unknown route. Please check the URI and try again.",
        }),
    )
}
