//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use mirrorboard_api::error::AppError;
use mirrorboard_core::LayoutError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: LayoutError::UnknownWidgetType maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_widget_type_returns_404() {
    let err = AppError::Layout(LayoutError::UnknownWidgetType("toaster".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "UNKNOWN_WIDGET_TYPE");
    assert_eq!(json["error"], "Unknown widget type: toaster");
}

// ---------------------------------------------------------------------------
// Test: LayoutError::CollisionRejected maps to 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collision_returns_400() {
    let err = AppError::Layout(LayoutError::CollisionRejected {
        id: "b".into(),
        conflicting_id: "a".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "COLLISION");
    assert_eq!(json["error"], "Widget 'b' would overlap widget 'a'");
}

// ---------------------------------------------------------------------------
// Test: LayoutError::PlacementExhausted maps to 409
// ---------------------------------------------------------------------------

#[tokio::test]
async fn placement_exhausted_returns_409() {
    let err = AppError::Layout(LayoutError::PlacementExhausted {
        widget_id: "calendar".into(),
        width: 4,
        height: 4,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "NO_SPACE");
}

// ---------------------------------------------------------------------------
// Test: LayoutError::Validation maps to 400 with the bare message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Layout(LayoutError::Validation("Duplicate widget id 'a'".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Duplicate widget id 'a'");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest and NotFound pass their message through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("bad body".into())).await;
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "bad body");
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(AppError::NotFound("no such thing".into())).await;
    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: I/O and internal errors map to 500 and sanitize the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn io_error_returns_500_and_sanitizes_message() {
    let err = AppError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "/etc/secret/config.json",
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(
        !json.to_string().contains("secret"),
        "Internal error response must not leak file paths"
    );
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("serializer exploded".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}
