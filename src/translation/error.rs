//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 分词结果中没有候选词
    #[error("句子中未找到可翻译的名词或动词")]
    NoCandidates,

    /// 所有候选词都处于抑制期
    #[error("所有候选词均被标记为简单词")]
    AllSuppressed,

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 上游返回了非成功状态或无法识别的响应结构
    #[error("响应解析失败: {0}")]
    ResponseError(String),

    /// 译文未通过内容校验
    #[error("翻译结果无效: {0}")]
    RejectedTranslation(String),

    /// 调用方已经不再等待结果
    #[error("客户端已断开连接，请求被取消")]
    Cancelled,

    /// 存储错误
    #[error("存储错误: {0}")]
    StorageError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    ///
    /// 核心流程内部从不重试，这里只给调用方的重试策略提供参考。
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::ResponseError(_) => true,
            TranslationError::StorageError(_) => true,
            TranslationError::RejectedTranslation(_) => false,
            TranslationError::ConfigError(_) => false,
            TranslationError::InvalidInput(_) => false,
            TranslationError::NoCandidates => false,
            TranslationError::AllSuppressed => false,
            TranslationError::Cancelled => false,
            TranslationError::SerializationError(_) => false,
            TranslationError::InternalError(_) => false,
        }
    }

    /// 是否属于上游翻译服务的失败
    pub fn is_provider_failure(&self) -> bool {
        self.category() == ErrorCategory::Provider
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::NoCandidates => ErrorSeverity::Info,
            TranslationError::AllSuppressed => ErrorSeverity::Info,
            TranslationError::Cancelled => ErrorSeverity::Info,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
            TranslationError::ResponseError(_) => ErrorSeverity::Error,
            TranslationError::RejectedTranslation(_) => ErrorSeverity::Warning,
            TranslationError::StorageError(_) => ErrorSeverity::Error,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::NoCandidates => ErrorCategory::Input,
            TranslationError::AllSuppressed => ErrorCategory::Suppression,
            TranslationError::NetworkError(_) => ErrorCategory::Provider,
            TranslationError::TimeoutError(_) => ErrorCategory::Provider,
            TranslationError::ResponseError(_) => ErrorCategory::Provider,
            TranslationError::RejectedTranslation(_) => ErrorCategory::Provider,
            TranslationError::Cancelled => ErrorCategory::Cancellation,
            TranslationError::StorageError(_) => ErrorCategory::Storage,
            TranslationError::SerializationError(_) => ErrorCategory::Storage,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let current_msg = self.to_string();
        let new_msg = format!("{} (上下文: {})", current_msg, context);

        match &mut self {
            TranslationError::ConfigError(ref mut msg)
            | TranslationError::InvalidInput(ref mut msg)
            | TranslationError::NetworkError(ref mut msg)
            | TranslationError::TimeoutError(ref mut msg)
            | TranslationError::ResponseError(ref mut msg)
            | TranslationError::RejectedTranslation(ref mut msg)
            | TranslationError::StorageError(ref mut msg)
            | TranslationError::SerializationError(ref mut msg)
            | TranslationError::InternalError(ref mut msg) => *msg = new_msg,
            // 无负载的变体保持原样
            TranslationError::NoCandidates
            | TranslationError::AllSuppressed
            | TranslationError::Cancelled => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Suppression,
    Provider,
    Cancellation,
    Storage,
    Internal,
}

/// 标准错误转换
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::InternalError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<redb::Error> for TranslationError {
    fn from(error: redb::Error) -> Self {
        TranslationError::StorageError(error.to_string())
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(format!("上游请求超时: {}", error))
        } else if error.is_decode() {
            TranslationError::ResponseError(format!("响应体无法解码: {}", error))
        } else if let Some(status) = error.status() {
            TranslationError::ResponseError(format!("上游返回状态码 {}", status))
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }

    /// 创建响应解析错误
    pub fn response_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ResponseError(msg.to_string())
    }

    /// 创建内部错误
    pub fn internal_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InternalError(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_share_category() {
        let errors = [
            TranslationError::NetworkError("connection refused".to_string()),
            TranslationError::TimeoutError("30s".to_string()),
            TranslationError::ResponseError("missing choices".to_string()),
            TranslationError::RejectedTranslation("too long".to_string()),
        ];

        for error in &errors {
            assert!(error.is_provider_failure(), "{:?} 应归类为上游失败", error);
        }
        assert!(!TranslationError::Cancelled.is_provider_failure());
        assert!(!TranslationError::AllSuppressed.is_provider_failure());
    }

    #[test]
    fn test_input_and_suppression_are_distinct() {
        assert_eq!(TranslationError::NoCandidates.category(), ErrorCategory::Input);
        assert_eq!(TranslationError::AllSuppressed.category(), ErrorCategory::Suppression);
        assert_ne!(
            TranslationError::NoCandidates.to_string(),
            TranslationError::AllSuppressed.to_string()
        );
    }

    #[test]
    fn test_with_context() {
        let error = helpers::config_error("缺少 api_url").with_context("providers.deepseek");
        assert!(error.to_string().contains("providers.deepseek"));

        let cancelled = TranslationError::Cancelled.with_context("ignored");
        assert!(matches!(cancelled, TranslationError::Cancelled));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Warning);
        assert_eq!(
            TranslationError::ConfigError(String::new()).severity(),
            ErrorSeverity::Critical
        );
    }
}
