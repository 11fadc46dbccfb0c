/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, allowing them to be
 * returned directly from handlers.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "message": "Validation failed",
 *   "error": "Blog name must be at least 3 characters",
 *   "field": "name"
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use crate::backend::error::types::BackendError;
use crate::shared::ErrorBody;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = ErrorBody {
            message: self.message(),
            error: self.detail(),
            field: self.field(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::shared::SharedError;

    #[test]
    fn test_into_response_status() {
        let response = BackendError::conflict("This subdomain is already taken").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = BackendError::from(SharedError::validation("title", "too short")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
