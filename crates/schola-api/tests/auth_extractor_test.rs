//! Owner identity extraction tests.
//!
//! The API must take the caller identity from the proxy-asserted header
//! only; a missing or malformed header is a 401 before any handler runs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use schola_api::auth::{OwnerIdentity, OWNER_HEADER};

fn app() -> Router {
    Router::new().route(
        "/whoami",
        get(|OwnerIdentity(id): OwnerIdentity| async move { id.to_string() }),
    )
}

#[tokio::test]
async fn test_missing_identity_header_is_unauthorized() {
    let response = app()
        .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn test_malformed_identity_header_is_unauthorized() {
    let response = app()
        .oneshot(
            Request::get("/whoami")
                .header(OWNER_HEADER, "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_identity_header_extracted() {
    let owner = Uuid::new_v4();
    let response = app()
        .oneshot(
            Request::get("/whoami")
                .header(OWNER_HEADER, owner.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, owner.to_string().as_bytes());
}
