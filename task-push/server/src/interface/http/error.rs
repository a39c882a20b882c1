//! API 错误到 HTTP 响应的映射

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use task_push_core::error::{ErrorCode, TaskPushError};

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    ServiceUnavailable(String),
    InternalServerError(String),
}

impl From<TaskPushError> for ApiError {
    fn from(err: TaskPushError) -> Self {
        match err.code() {
            ErrorCode::InvalidParameter => ApiError::BadRequest(err.message().to_string()),
            ErrorCode::NotFound => ApiError::NotFound(err.message().to_string()),
            ErrorCode::ServiceUnavailable => ApiError::ServiceUnavailable(err.to_string()),
            _ => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::ServiceUnavailable(err) => {
                tracing::warn!("Service unavailable: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "A downstream service is unavailable" }),
                )
            }
            ApiError::InternalServerError(err) => {
                tracing::error!("Internal server error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_push_core::error::ErrorBuilder;

    #[test]
    fn error_codes_map_to_status() {
        let cases = [
            (ErrorCode::InvalidParameter, StatusCode::BAD_REQUEST),
            (ErrorCode::NotFound, StatusCode::NOT_FOUND),
            (ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorCode::StorageError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let err = ErrorBuilder::new(code, "boom").build_error();
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
