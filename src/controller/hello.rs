use axum::extract::State;

use crate::shared::structs::AppState;

/// Liveness check echoing the application this worker answers for.
pub async fn hello(State(app_state): State<AppState>) -> String {
    format!("👋 {}", app_state.config.credentials.application_id)
}
