use axum::http::StatusCode;
use axum::response::IntoResponse;

pub mod discord;
pub mod hello;
pub mod register;

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found.")
}
