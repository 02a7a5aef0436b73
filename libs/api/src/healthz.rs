use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::ApiState;

/// 200 while the database answers, 503 otherwise.
pub(super) async fn get_health(State(state): State<Arc<ApiState>>) -> StatusCode {
    match state.repo.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            warn!("health check failed: {:?}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
