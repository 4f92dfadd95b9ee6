//! Request extractors
//!
//! The upstream authentication layer verifies the session or token and puts
//! the resulting claims into request extensions as [`VerifiedClaims`].
//! [`attach_subject`] normalizes those into a [`Subject`] once per request;
//! handlers then receive it explicitly through [`CurrentSubject`] or
//! [`RequireSubject`].

use crate::response::ApiError;
use async_trait::async_trait;
use auth_identity::{IdentityService, Subject};
use axum::{
    extract::{FromRequest, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use error_common::{AppError, FieldErrors};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;

use crate::validation::BODY_FIELD;

/// Claims already verified by the authentication layer
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub Value);

/// Middleware: turn [`VerifiedClaims`] into a [`Subject`] extension.
///
/// Requests without claims pass through anonymous. Claims that do not
/// normalize are rejected with `UNAUTHORIZED` instead of being downgraded to
/// anonymous.
pub async fn attach_subject(
    State(identity): State<Arc<IdentityService>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(VerifiedClaims(claims)) = request.extensions().get::<VerifiedClaims>().cloned() {
        match identity.from_claims(&claims) {
            Ok(subject) => {
                request.extensions_mut().insert(subject);
            }
            Err(err) => return ApiError::from(err).into_response(),
        }
    }

    next.run(request).await
}

/// Subject of the current request, if authenticated
#[derive(Debug, Clone)]
pub struct CurrentSubject(pub Option<Subject>);

impl CurrentSubject {
    pub fn subject(&self) -> Option<&Subject> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSubject
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Subject>().cloned()))
    }
}

/// Subject of the current request; rejects anonymous requests with `UNAUTHORIZED`
#[derive(Debug, Clone)]
pub struct RequireSubject(pub Subject);

#[async_trait]
impl<S> FromRequestParts<S> for RequireSubject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Subject>()
            .cloned()
            .map(Self)
            .ok_or_else(|| ApiError(AppError::unauthorized()))
    }
}

/// Raw JSON body whose parse failures use the error envelope
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let mut details = FieldErrors::new();
                details.insert(BODY_FIELD.to_string(), vec![rejection.body_text()]);
                Err(ApiError(AppError::validation(details)))
            }
        }
    }
}
