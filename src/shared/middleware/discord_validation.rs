use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;

use crate::shared::structs::{AppState, ErrorResponse};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

const SIGNATURE_LENGTH: usize = 64;
const PUBLIC_KEY_LENGTH: usize = 32;

/// Rejects POST requests whose ed25519 signature does not match the body.
/// Other methods pass through untouched.
pub async fn validate_interaction(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let signature = header_value(&headers, SIGNATURE_HEADER);
    let timestamp = header_value(&headers, TIMESTAMP_HEADER);
    tracing::debug!(
        "Validating interaction with signature {:?} and timestamp {:?}",
        &signature,
        &timestamp
    );

    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        tracing::error!("Interaction is missing its signature headers.");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("required params not found")),
        )
            .into_response();
    };

    let public_key = match hex::decode(&app_state.config.credentials.public_key) {
        Ok(key) if key.len() == PUBLIC_KEY_LENGTH => key,
        _ => {
            let error_msg = "Application public key is missing or not valid hex.";
            tracing::error!("{}", error_msg);
            return (StatusCode::INTERNAL_SERVER_ERROR, error_msg).into_response();
        }
    };

    match buffer_request_body(request, &signature, &timestamp, &public_key).await {
        Ok(request) => next.run(request).await,
        Err(e) => e,
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

async fn buffer_request_body(
    request: axum::extract::Request,
    signature: &str,
    timestamp: &str,
    public_key: &[u8],
) -> Result<axum::extract::Request, Response> {
    let (parts, body) = request.into_parts();

    let bytes: Bytes = body
        .collect()
        .await
        .map_err(|e| {
            let error_msg = format!("Internal server error when collecting body bytes: {e:?}");
            tracing::error!("{}", &error_msg);
            (StatusCode::INTERNAL_SERVER_ERROR, error_msg).into_response()
        })?
        .to_bytes();

    if verify_key(&bytes, signature, timestamp, public_key) {
        Ok(axum::extract::Request::from_parts(parts, Body::from(bytes)))
    } else {
        tracing::error!("Invalid request signature.");
        Err((StatusCode::UNAUTHORIZED, "Bad request signature.").into_response())
    }
}

/// Checks `signature` (hex) over `timestamp || body` against `public_key`.
/// Malformed signatures count as invalid.
pub fn verify_key(body: &[u8], signature: &str, timestamp: &str, public_key: &[u8]) -> bool {
    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };
    if signature_bytes.len() != SIGNATURE_LENGTH || public_key.len() != PUBLIC_KEY_LENGTH {
        return false;
    }

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    match nacl::sign::verify(&signature_bytes, &message, public_key) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::debug!("Signature verification failed: {e:?}");
            false
        }
    }
}
