use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use mirrorboard_api::config::ServerConfig;
use mirrorboard_api::router::build_app_router;
use mirrorboard_api::state::{AppState, EnvSource};
use mirrorboard_api::storage::LayoutFile;
use mirrorboard_core::WidgetRegistry;

/// Build a test `ServerConfig` storing the layout at `layout_file`.
pub fn test_config(layout_file: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        layout_file: layout_file.to_path_buf(),
    }
}

/// Build the full application router with all middleware layers, storing the
/// layout at `config.json` inside `dir`. `env` lists the environment
/// variables setup checks treat as set.
pub async fn build_test_app(dir: &Path, env: &[&str]) -> Router {
    let config = test_config(&dir.join("config.json"));
    let layout = LayoutFile::open(&config.layout_file).await;

    let state = AppState {
        config: Arc::new(config.clone()),
        layout: Arc::new(layout),
        registry: Arc::new(WidgetRegistry::builtin()),
        env: Arc::new(EnvSource::Fixed(
            env.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        )),
    };

    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a raw JSON body.
pub async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
