use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use kartela_core::KartelaError;
use kartela_core::error::FieldError;
use kartela_core::testing::TestApp;

async fn body_json(err: KartelaError) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let res = err.into_response();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_status_codes() {
    let cases = [
        (KartelaError::NotFound("x".into()), 404, "NOT_FOUND"),
        (KartelaError::BadRequest("x".into()), 400, "BAD_REQUEST"),
        (KartelaError::Unauthorized("x".into()), 401, "UNAUTHORIZED"),
        (KartelaError::SessionRequired("x".into()), 401, "SESSION_REQUIRED"),
        (KartelaError::Forbidden("x".into()), 403, "FORBIDDEN"),
        (KartelaError::Conflict("x".into()), 409, "CONFLICT"),
        (KartelaError::Validation("x".into()), 422, "VALIDATION_ERROR"),
        (KartelaError::RateLimited(5), 429, "RATE_LIMITED"),
        (KartelaError::Internal("x".into()), 500, "INTERNAL_ERROR"),
    ];
    for (err, status, code) in cases {
        assert_eq!(err.status_code().as_u16(), status, "{}", code);
        assert_eq!(err.error_code(), code);
        assert!(!err.user_message().is_empty());
    }
}

#[tokio::test]
async fn test_session_required_carries_redirect() {
    let (status, _, json) = body_json(KartelaError::SessionRequired("expired".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["redirect"], "/access");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_other_errors_have_no_redirect() {
    let (_, _, json) = body_json(KartelaError::Forbidden("no".into())).await;
    assert!(json["error"].get("redirect").is_none());
    assert!(json["error"].get("fields").is_none());
}

#[tokio::test]
async fn test_rate_limited_sets_retry_after() {
    let (status, headers, _) = body_json(KartelaError::RateLimited(42)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers[header::RETRY_AFTER], "42");
}

#[tokio::test]
async fn test_field_errors_listed() {
    let err = KartelaError::validation_fields(vec![
        FieldError::new("code", "code is required"),
        FieldError::with_code("capacity", "too small", "range"),
    ]);
    let (status, _, json) = body_json(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["fields"][0]["field"], "code");
    assert_eq!(json["error"]["fields"][1]["code"], "range");
    assert_eq!(
        json["error"]["message"],
        "code: code is required; capacity: too small"
    );
}

#[tokio::test]
async fn test_invalid_json_body() {
    let app = TestApp::new().await;
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/access/badge")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("not valid json at all"))
        .unwrap();

    let res = app.send(req).await;
    assert_eq!(res.status, 422);
    assert!(!res.is_success());
    assert_eq!(res.error_code().as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new().await;
    let res = app.get("/api/nonexistent").await;
    assert_eq!(res.status, 404);
}
