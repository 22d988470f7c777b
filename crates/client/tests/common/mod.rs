use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use mirrorboard_client::ClientConfig;
use mirrorboard_core::DashboardLayout;

/// Layout held by the stub server; `None` until something is posted.
pub type SharedLayout = Arc<Mutex<Option<DashboardLayout>>>;

async fn get_layout(State(layout): State<SharedLayout>) -> impl IntoResponse {
    match layout.lock().unwrap().clone() {
        Some(layout) => Json(layout).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn post_layout(
    State(layout): State<SharedLayout>,
    Json(body): Json<DashboardLayout>,
) -> impl IntoResponse {
    *layout.lock().unwrap() = Some(body);
    Json(serde_json::json!({ "success": true, "message": "Layout saved successfully" }))
}

async fn setup_status(Path(widget): Path<String>) -> impl IntoResponse {
    match widget.as_str() {
        "photos" => Json(serde_json::json!({ "configured": true, "missing": [] })).into_response(),
        "tesla" => Json(serde_json::json!({ "configured": false, "missing": ["TESSIE_VIN"] }))
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Bind `app` to an ephemeral port and serve it in the background.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A well-behaved layout backend. Returns its address and the shared layout.
pub async fn spawn_layout_server(initial: Option<DashboardLayout>) -> (SocketAddr, SharedLayout) {
    let layout: SharedLayout = Arc::new(Mutex::new(initial));
    let app = Router::new()
        .route("/api/layout", get(get_layout).post(post_layout))
        .route("/api/setup/{widget}/status", get(setup_status))
        .with_state(Arc::clone(&layout));
    (serve(app).await, layout)
}

/// A backend that answers every request with `status` and `body`.
pub async fn spawn_failing_server(status: StatusCode, body: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move || async move { (status, body) });
    serve(app).await
}

/// An address nothing is listening on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        api_url: format!("http://{addr}"),
        request_timeout_secs: 5,
    }
}
