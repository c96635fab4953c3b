//! API 处理器

pub mod memory;
pub mod stats;
pub mod translation;

pub use memory::*;
pub use stats::*;
pub use translation::*;

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};

use crate::translation::error::helpers::{log_error, validation_error};
use crate::translation::{ErrorCategory, TranslationError};

/// 处理器统一的错误响应
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// 错误对应的 HTTP 状态码
pub fn status_for(error: &TranslationError) -> StatusCode {
    match error {
        TranslationError::NoCandidates | TranslationError::AllSuppressed => StatusCode::NOT_FOUND,
        TranslationError::Cancelled => StatusCode::NO_CONTENT,
        _ => match error.category() {
            ErrorCategory::Input => StatusCode::BAD_REQUEST,
            ErrorCategory::Provider => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// 把错误转换为 JSON 错误响应
///
/// `retryable` 供调用方决定是否重试，服务端从不自动重试。
pub fn error_response(error: &TranslationError) -> ApiError {
    (
        status_for(error),
        Json(serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "retryable": error.is_retryable()
        })),
    )
}

/// 请求体无法解析时按输入错误处理
pub fn rejection_response(rejection: JsonRejection) -> ApiError {
    let error = validation_error(rejection.body_text());
    log_error(&error);
    error_response(&error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&TranslationError::InvalidInput("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&TranslationError::NoCandidates), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&TranslationError::AllSuppressed), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&TranslationError::TimeoutError("30s".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&TranslationError::RejectedTranslation("too long".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&TranslationError::StorageError("io".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(&TranslationError::Cancelled), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_error_body_reports_retryable() {
        let (status, Json(body)) =
            error_response(&TranslationError::NetworkError("reset".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], true);
        assert_eq!(body["retryable"], true);

        let (_, Json(body)) = error_response(&TranslationError::AllSuppressed);
        assert_eq!(body["retryable"], false);
    }
}
