use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Json,
    response::{IntoResponse, Response},
};

use crate::controller::discord::interaction::COMMAND_REGISTRY;
use crate::shared::structs::{AppState, DataResponse, ErrorResponse};
use crate::shared::utility::discord::register_global_commands;

pub async fn register(State(app_state): State<AppState>) -> Response {
    let credentials = &app_state.config.credentials;
    let result = register_global_commands(
        &app_state.http_client,
        &app_state.config.discord_api_root,
        &credentials.application_id,
        &credentials.token,
        &COMMAND_REGISTRY.catalog(),
    )
    .await;

    match result {
        Ok(()) => {
            tracing::info!("Registered all commands");
            (
                StatusCode::OK,
                Json(DataResponse {
                    data: "Registered all commands".into(),
                }),
            )
                .into_response()
        }
        Err(e) if e.is_expected() => {
            tracing::error!("Failed to register commands: {}", e);
            (StatusCode::FORBIDDEN, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        Err(e) => {
            tracing::error!("Unexpected error while registering commands: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Unexpected error")),
            )
                .into_response()
        }
    }
}
