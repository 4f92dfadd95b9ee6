use auth_guard::OwnershipError;
use auth_identity::IdentityError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use error_common::{report_error, AppError};

/// Boundary wrapper that renders an [`AppError`] as the JSON envelope.
///
/// Every error is reported exactly once here, so handlers and the core stay
/// free of logging.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn into_inner(self) -> AppError {
        self.0
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        report_error(&self.0);

        (status, Json(self.0.envelope())).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl From<IdentityError> for ApiError {
    fn from(error: IdentityError) -> Self {
        Self(error.into())
    }
}

impl From<OwnershipError> for ApiError {
    fn from(error: OwnershipError) -> Self {
        Self(error.into())
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
