//! Task Push Core 错误工具模块
//!
//! - 统一的业务错误码与错误类型
//! - `ErrorBuilder` 用于基础设施层构建带上下文的错误

use std::fmt;

use thiserror::Error;

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidParameter,
    NotFound,
    ConfigurationError,
    StorageError,
    ServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 统一错误类型
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct TaskPushError {
    code: ErrorCode,
    message: String,
    details: Option<String>,
}

impl TaskPushError {
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 底层错误描述（如果有）
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

pub type Result<T, E = TaskPushError> = std::result::Result<T, E>;

/// 错误构建器
///
/// ```rust
/// use task_push_core::error::{ErrorBuilder, ErrorCode};
///
/// let err = ErrorBuilder::new(ErrorCode::StorageError, "failed to write tasks")
///     .details("disk full")
///     .build_error();
/// assert_eq!(err.code(), ErrorCode::StorageError);
/// assert_eq!(err.details(), Some("disk full"));
/// ```
#[derive(Debug)]
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    details: Option<String>,
}

impl ErrorBuilder {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }

    pub fn build_error(self) -> TaskPushError {
        TaskPushError {
            code: self.code,
            message: self.message,
            details: self.details,
        }
    }
}

/// 便捷宏：构建指定错误码的错误并提前返回
#[macro_export]
macro_rules! bail_code {
    ($code:expr, $msg:expr) => {
        return Err($crate::error::ErrorBuilder::new($code, $msg).build_error())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(flag: bool) -> Result<()> {
        if flag {
            bail_code!(ErrorCode::InvalidParameter, "flag must be false");
        }
        Ok(())
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = ErrorBuilder::new(ErrorCode::NotFound, "task not found").build_error();
        assert_eq!(err.to_string(), "[NOT_FOUND] task not found");
        assert!(err.details().is_none());
    }

    #[test]
    fn bail_code_returns_early() {
        let err = reject(true).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert!(reject(false).is_ok());
    }
}
