use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use tracing::Level;

use crate::{
    controller::{
        discord::interaction::handle_interaction, hello::hello, not_found, register::register,
    },
    shared::{
        middleware::discord_validation::validate_interaction,
        structs::{AppState, config::Configuration},
    },
};

mod controller;
mod shared;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Configuration::load()?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(parse_log_level(&config.log_level))
        .pretty()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!(
            "Initialization of tracing subscriber failed with error: {}",
            e
        );
    }

    if config.credentials.public_key.is_empty() {
        tracing::warn!("DISCORD_PUBLIC_KEY is not set; interactions will be refused.");
    }

    let server_bind_point = config.server_address();
    let app = create_router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&server_bind_point).await?;
    tracing::info!("Listening on {}", &server_bind_point);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(hello).post(handle_interaction).fallback(not_found),
        )
        .route("/register", put(register).fallback(not_found))
        .fallback(not_found)
        .layer(from_fn_with_state(app_state.clone(), validate_interaction))
        .with_state(app_state)
}

fn parse_log_level(level: &str) -> Level {
    match level {
        "TRACE" => Level::TRACE,
        "INFO" => Level::INFO,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::DEBUG,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use ed25519_dalek::{Signer, SigningKey};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::shared::middleware::discord_validation::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
    use crate::shared::quotes::QUOTES;
    use crate::shared::structs::config::DiscordCredentials;

    const TIMESTAMP: &str = "1700000000";

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[42u8; 32])
    }

    fn test_state(api_root: &str, token: &str) -> AppState {
        let mut config = Configuration::new();
        config.discord_api_root = api_root.into();
        config.credentials = DiscordCredentials {
            token: token.into(),
            public_key: hex::encode(signing_key().verifying_key().to_bytes()),
            application_id: "1234".into(),
        };
        AppState::new(config).unwrap()
    }

    fn app() -> Router {
        create_router(test_state("http://127.0.0.1:1", "secret-token"))
    }

    fn signed_post(body: &str) -> Request<Body> {
        let mut message = TIMESTAMP.as_bytes().to_vec();
        message.extend_from_slice(body.as_bytes());
        let signature = hex::encode(signing_key().sign(&message).to_bytes());

        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, TIMESTAMP)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.expect("failed to make request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn as_json(body: &str) -> Value {
        serde_json::from_str(body).expect("response should be valid JSON")
    }

    #[tokio::test]
    async fn hello_echoes_application_id() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "👋 1234");
    }

    #[tokio::test]
    async fn signed_ping_gets_pong() {
        let (status, body) = send(app(), signed_post(r#"{"type":1}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!({ "type": 1 }));
    }

    #[tokio::test]
    async fn signed_quote_command_returns_a_quote() {
        let payload = r#"{"type":2,"id":"99","data":{"id":"1","name":"RandomQuote"}}"#;
        let (status, body) = send(app(), signed_post(payload)).await;

        assert_eq!(status, StatusCode::OK);
        let value = as_json(&body);
        assert_eq!(value["type"], 4);
        let content = value["data"]["content"].as_str().unwrap();
        assert!(QUOTES.contains(&content));
    }

    #[tokio::test]
    async fn missing_signature_headers_are_unauthorized() {
        for (name, value) in [(SIGNATURE_HEADER, "00"), (TIMESTAMP_HEADER, TIMESTAMP)] {
            let request = Request::post("/")
                .header(name, value)
                .body(Body::from(r#"{"type":1}"#))
                .unwrap();
            let (status, body) = send(app(), request).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(as_json(&body), json!({ "error": "required params not found" }));
        }
    }

    #[tokio::test]
    async fn tampered_body_is_rejected() {
        let original = signed_post(r#"{"type":1}"#);
        let (parts, _) = original.into_parts();
        let tampered = Request::from_parts(parts, Body::from(r#"{"type":2}"#));

        let (status, body) = send(app(), tampered).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Bad request signature.");
    }

    #[tokio::test]
    async fn unknown_type_and_command_are_bad_requests() {
        for payload in [
            r#"{"type":3}"#,
            r#"{"type":2,"data":{"name":"weather"}}"#,
        ] {
            let (status, body) = send(app(), signed_post(payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(as_json(&body), json!({ "error": "Unknown Type" }));
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_a_bad_request() {
        let (status, body) = send(app(), signed_post("not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            as_json(&body),
            json!({ "error": "Invalid interaction payload" })
        );
    }

    #[tokio::test]
    async fn unusable_public_key_is_an_internal_error() {
        let mut state = test_state("http://127.0.0.1:1", "secret-token");
        state.config.credentials.public_key = String::new();

        let (status, _) = send(create_router(state), signed_post(r#"{"type":1}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unlisted_routes_are_not_found() {
        for (method, uri) in [
            ("DELETE", "/foo"),
            ("GET", "/foo"),
            ("DELETE", "/"),
            ("PUT", "/"),
            ("GET", "/register"),
            ("PATCH", "/register"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(app(), request).await;

            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body, "Not Found.");
        }
    }

    #[tokio::test]
    async fn register_pushes_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/applications/1234/commands"))
            .and(header("authorization", "Bot secret-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let app = create_router(test_state(&server.uri(), "secret-token"));
        let request = Request::put("/register").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body), json!({ "data": "Registered all commands" }));

        let received = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(sent[0]["name"], "randomquote");
    }

    #[tokio::test]
    async fn register_reports_upstream_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let app = create_router(test_state(&server.uri(), "secret-token"));
        let request = Request::put("/register").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(as_json(&body), json!({ "error": "Error registering commands" }));
    }

    #[tokio::test]
    async fn register_without_token_is_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = create_router(test_state(&server.uri(), ""));
        let request = Request::put("/register").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            as_json(&body),
            json!({ "error": "The DISCORD_TOKEN environment variable is required." })
        );
    }

    #[tokio::test]
    async fn register_transport_failure_is_unexpected() {
        let request = Request::put("/register").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(as_json(&body), json!({ "error": "Unexpected error" }));
    }

    #[test]
    fn log_level_falls_back_to_debug() {
        assert_eq!(parse_log_level("WARN"), Level::WARN);
        assert_eq!(parse_log_level("TRACE"), Level::TRACE);
        assert_eq!(parse_log_level("verbose"), Level::DEBUG);
    }
}
