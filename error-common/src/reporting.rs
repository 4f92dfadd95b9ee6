// Error reporting at the request boundary.
// The core never logs; callers hand every surfaced error to `report_error` once.

use crate::types::{AppError, ErrorKind};
use uuid::Uuid;

/// Log an error with a correlation id and return that id.
///
/// Internal failures are logged at `error` with their retained cause. Expected
/// client errors (denials, validation, conflicts) are logged at `debug`.
pub fn report_error(error: &AppError) -> Uuid {
    let error_id = Uuid::new_v4();

    match error.kind() {
        ErrorKind::Internal => {
            let cause = error
                .cause()
                .map(|c| format!("{:#}", c))
                .unwrap_or_else(|| error.message().to_string());
            tracing::error!(
                error_id = %error_id,
                error_code = error.code(),
                status_code = error.status_code(),
                cause = %cause,
                "Internal error surfaced to client"
            );
        }
        _ => {
            tracing::debug!(
                error_id = %error_id,
                error_code = error.code(),
                status_code = error.status_code(),
                "Request rejected: {}",
                error.message()
            );
        }
    }

    error_id
}
