//! End-to-end tests through an axum router
//!
//! Checks the wire contract: status codes and the
//! `{ "error": { code, message, details? } }` envelope for each denial path.

use auth_gateway::*;
use auth_guard::{AuthorizationGuard, InMemoryOwnershipStore, Permission, ResourceKind, ResourceRef};
use auth_identity::IdentityService;
use axum::{
    body::Body,
    extract::{Path, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{post, put},
    Json, Router,
};
use http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const CLAIMS_HEADER: &str = "x-test-claims";

#[derive(Clone)]
struct AppState {
    authorizer: RequestAuthorizer,
}

fn quote_schema() -> Schema {
    Schema::new()
        .field("id", [Rule::Required, Rule::MaxLength(64)])
        .field("text", [Rule::Required, Rule::MaxLength(1000)])
}

fn new_quote_schema() -> Schema {
    Schema::new()
        .field("authorId", [Rule::Required])
        .field("text", [Rule::Required])
}

fn category_schema() -> Schema {
    Schema::new()
        .field("name", [Rule::Required])
        .field("slug", [Rule::Required, Rule::Slug])
}

async fn update_quote(
    State(state): State<AppState>,
    current: CurrentSubject,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    let raw = with_path_param(body, "id", &id);
    let input = state
        .authorizer
        .authorize_input(
            current.subject(),
            Permission::UpdateQuote,
            &quote_schema(),
            &raw,
            ResourceTarget::Field("id"),
        )
        .await?;
    Ok(Json(input.into_value()))
}

async fn create_quote(
    State(state): State<AppState>,
    current: CurrentSubject,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    let input = state
        .authorizer
        .authorize_input(
            current.subject(),
            Permission::CreateQuote,
            &new_quote_schema(),
            &body,
            ResourceTarget::Field("authorId"),
        )
        .await?;
    Ok(Json(input.into_value()))
}

async fn create_category(
    State(state): State<AppState>,
    RequireSubject(subject): RequireSubject,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Value>> {
    let input = state
        .authorizer
        .authorize_input(
            Some(&subject),
            Permission::ManageCategories,
            &category_schema(),
            &body,
            ResourceTarget::None,
        )
        .await?;
    Ok(Json(input.into_value()))
}

// Stands in for the real authentication layer
async fn inject_claims(mut request: Request, next: Next) -> Response {
    let claims = request
        .headers()
        .get(CLAIMS_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| serde_json::from_str::<Value>(s).ok());
    if let Some(claims) = claims {
        request.extensions_mut().insert(VerifiedClaims(claims));
    }
    next.run(request).await
}

fn app() -> Router {
    let store = InMemoryOwnershipStore::new();
    store.insert(ResourceRef::quote("q1", "u1"));
    store.insert(ResourceRef::quote("q2", "u2"));
    store.insert(ResourceRef::new(ResourceKind::AuthorProfile, "a1", "u1"));

    let state = AppState {
        authorizer: RequestAuthorizer::new(AuthorizationGuard::new(Arc::new(store)), ValidationConfig::default()),
    };
    let identity = Arc::new(IdentityService::default());

    Router::new()
        .route("/quotes", post(create_quote))
        .route("/quotes/:id", put(update_quote))
        .route("/categories", post(create_category))
        .with_state(state)
        .layer(middleware::from_fn_with_state(identity, attach_subject))
        .layer(middleware::from_fn(inject_claims))
}

async fn send(method: &str, uri: &str, claims: Option<Value>, body: &str) -> (StatusCode, Value) {
    let mut builder = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(claims) = claims {
        builder = builder.header(CLAIMS_HEADER, claims.to_string());
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn author(id: &str) -> Option<Value> {
    Some(json!({ "sub": id, "role": "AUTHOR" }))
}

#[tokio::test]
async fn test_author_updates_own_quote() {
    let (status, body) = send("PUT", "/quotes/q1", author("u1"), r#"{"text":"Amor fati"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "q1", "text": "Amor fati" }));
}

#[tokio::test]
async fn test_author_updates_foreign_quote() {
    let (status, body) = send("PUT", "/quotes/q2", author("u1"), r#"{"text":"Amor fati"}"#).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "QUOTE_ACCESS_DENIED");
    assert!(body["error"].get("details").is_none());
}

#[tokio::test]
async fn test_user_manages_categories() {
    let claims = Some(json!({ "sub": "u3", "role": "user" }));
    let (status, body) = send("POST", "/categories", claims, r#"{"name":"Stoicism","slug":"stoicism"}"#).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_anonymous_create_quote() {
    let (status, body) = send("POST", "/quotes", None, r#"{"authorId":"a1","text":"Memento mori"}"#).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_require_subject_rejects_anonymous() {
    let (status, body) = send("POST", "/categories", None, r#"{"name":"Stoicism","slug":"stoicism"}"#).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_create_quote_for_own_author_profile() {
    let (status, _) = send("POST", "/quotes", author("u1"), r#"{"authorId":"a1","text":"Memento mori"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send("POST", "/quotes", author("u2"), r#"{"authorId":"a1","text":"Memento mori"}"#).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "QUOTE_ACCESS_DENIED");
}

#[tokio::test]
async fn test_missing_quote_is_not_found() {
    let (status, body) = send("PUT", "/quotes/q404", author("u1"), r#"{"text":"Amor fati"}"#).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_validation_envelope_lists_every_field() {
    let claims = Some(json!({ "sub": "root", "role": "ADMIN" }));
    let (status, body) = send("POST", "/categories", claims, r#"{"name":"","slug":"Not A Slug"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let details = body["error"]["details"].as_object().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details.contains_key("name"));
    assert!(details.contains_key("slug"));
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let (status, body) = send("PUT", "/quotes/q1", author("u1"), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["body"].is_array());
}

#[tokio::test]
async fn test_unknown_role_claim_is_unauthorized() {
    let claims = Some(json!({ "sub": "u1", "role": "SUPERUSER" }));
    let (status, body) = send("PUT", "/quotes/q1", claims, r#"{"text":"Amor fati"}"#).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert!(!body["error"]["message"].as_str().unwrap().contains("SUPERUSER"));
}

#[tokio::test]
async fn test_admin_bypasses_ownership() {
    let claims = Some(json!({ "sub": "root", "role": "ADMIN" }));
    let (status, _) = send("PUT", "/quotes/q2", claims, r#"{"text":"Amor fati"}"#).await;

    assert_eq!(status, StatusCode::OK);
}
