use crate::types::{AppError, FieldErrors};
use serde::{Deserialize, Serialize};

/// Wire shape every route reproduces: `{ "error": { "code", "message", "details"? } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

impl From<&AppError> for ErrorEnvelope {
    fn from(error: &AppError) -> Self {
        Self {
            error: ErrorBody {
                code: error.code().to_string(),
                message: error.client_message().to_string(),
                details: error.details().cloned(),
            },
        }
    }
}

impl AppError {
    /// Client-facing envelope for this error
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::from(self)
    }
}
