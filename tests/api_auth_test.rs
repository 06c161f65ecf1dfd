// tests/api_auth_test.rs
//
// Guarda das rotas de negócio exercitada sem banco: token e cabeçalho de
// organização são validados antes de qualquer consulta.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use procurement_backend::create_router;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/procurement_unused")
        .expect("lazy pool");
    create_router(common::app_state(pool))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = app()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let response = app()
        .oneshot(
            Request::get("/api/po-suggestions")
                .header("x-organization-id", Uuid::new_v4().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid or missing authentication token.");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthorized() {
    let claims = procurement_backend::models::auth::Claims {
        sub: Uuid::new_v4(),
        exp: (chrono::Utc::now().timestamp() + 600) as usize,
        iat: chrono::Utc::now().timestamp() as usize,
    };
    let forged = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"outro-segredo"),
    )
    .unwrap();

    let response = app()
        .oneshot(
            Request::post("/api/po-suggestions")
                .header(header::AUTHORIZATION, format!("Bearer {forged}"))
                .header("x-organization-id", Uuid::new_v4().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_without_organization_header_is_bad_request() {
    let token = common::token_for(Uuid::new_v4());

    let response = app()
        .oneshot(
            Request::get("/api/purchase-orders")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "The x-organization-id header is required.");
}

#[tokio::test]
async fn malformed_organization_header_is_bad_request() {
    let token = common::token_for(Uuid::new_v4());

    let response = app()
        .oneshot(
            Request::get("/api/supplier-quotations")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header("x-organization-id", "acme")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = app()
        .oneshot(
            Request::get("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"]["/api/po-suggestions"].is_object());
}
