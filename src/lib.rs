//! # Translens Library
//!
//! 自适应选词与翻译缓存引擎：从句子中挑选学习者需要巩固的单词，
//! 调用外部翻译服务并缓存结果，被标记为“太简单”的单词按遗忘曲线暂时隐藏。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量
//! - `translation` - 选词、翻译、缓存和持久化
//! - `web` - HTTP 服务（可选）

pub mod env;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use translation::{
    CancelToken, ConfigManager, HttpProvider, OrchestratorOptions, RateLimiter, Selection, Store,
    TranslationError, TranslationOrchestrator, TranslationProvider, TranslationResult,
};
