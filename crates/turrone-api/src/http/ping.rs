//! Liveness probe.

use axum::Json;

use crate::models::MessageResponse;

/// The "pong" to your "ping".
pub(crate) async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse { message: "pong" })
}
