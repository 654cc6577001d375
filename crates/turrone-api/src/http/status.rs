//! Component health snapshot.

use axum::Json;
use axum::extract::State;

use crate::models::StatusResponse;
use crate::state::ApiState;

/// Report the current status of every tracked server component.
pub(crate) async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        components: state.status.snapshot(),
    })
}
