//! Unit tests for HTTP error mapping

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use dcalytics::core::http::ApiError;
use dcalytics::dca::error::DcaError;
use serde_json::Value;

async fn render(error: ApiError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: Value = serde_json::from_slice(&bytes).expect("json error body");
    (status, body)
}

#[tokio::test]
async fn test_invalid_result_is_internal_error_without_details() {
    let (status, body) = render(ApiError::Engine(DcaError::InvalidResult(
        "risk score must lie in [0, 1], got 1.7".to_string(),
    )))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to compute strategy");
    assert!(!body.to_string().contains("risk score"));
}

#[tokio::test]
async fn test_internal_error_hides_message() {
    let (status, body) = render(ApiError::Internal("task panicked".to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("panicked"));
}

#[tokio::test]
async fn test_insufficient_returns_is_unavailable() {
    let (status, body) = render(ApiError::Engine(DcaError::InsufficientReturns {
        required: 10,
        available: 4,
    }))
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("need at least 10"));
}

#[tokio::test]
async fn test_client_errors_are_unprocessable() {
    for error in [
        ApiError::Validation("duration_months must be between 1 and 120".to_string()),
        ApiError::Engine(DcaError::InvalidParameter("bad".to_string())),
        ApiError::Engine(DcaError::InvalidPriceData("short".to_string())),
    ] {
        let (status, body) = render(error).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_missing_snapshot_and_timeout() {
    let (status, _) = render(ApiError::SnapshotUnavailable).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = render(ApiError::Timeout).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Optimization timed out");
}
