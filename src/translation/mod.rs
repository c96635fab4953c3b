//! 选词翻译模块
//!
//! 从句子的候选词中挑选一个单词，翻译并缓存结果：
//! - **core**: 速率限制、取消、选词、翻译提供者和编排器
//! - **pipeline**: 候选词提取
//! - **storage**: 持久化存储、翻译缓存、频次统计和抑制调度
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use translens::translation::{
//!     CancelToken, ConfigManager, HttpProvider, OrchestratorOptions, RateLimiter, Store,
//!     TranslationOrchestrator,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigManager::new()?;
//! let provider_config = config.active_provider()?;
//! let limiter = RateLimiter::from_config(&provider_config);
//! let provider = HttpProvider::new(provider_config)?;
//! let store = Arc::new(Store::open(config.database_path())?);
//!
//! let orchestrator =
//!     TranslationOrchestrator::new(provider, limiter, store, OrchestratorOptions::default());
//!
//! let candidates = vec!["猫".to_string(), "坐".to_string(), "向日葵".to_string()];
//! let selection = orchestrator
//!     .select_and_translate("猫坐在垂头的向日葵旁", &candidates, &CancelToken::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

/// 配置管理模块
///
/// 提供者配置、默认配置和内置默认值的三级解析
pub mod config;

/// 核心模块
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 候选词预处理
pub mod pipeline;

/// 存储管理模块
///
/// 嵌入式数据库以及建立在其上的缓存、频次和记忆组件
pub mod storage;

// ============================================================================
// 公共API导出
// ============================================================================

pub use config::{ConfigManager, ProviderConfig, ProviderProfile, RawConfig};

pub use self::core::{
    Admission, CancelOnDrop, CancelToken, HealthLevel, HealthStatus, HttpProvider,
    OrchestratorOptions, RateLimiter, Selection, ServiceStats, ServiceStatsSnapshot,
    TranslationOrchestrator, TranslationProvider, WeightedSelector,
};

pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};

pub use pipeline::{dedup_preserving_order, CandidateTagger, DelimitedTagger};

pub use storage::{
    cache_key, CacheEntry, EasyMark, Store, StoreStats, SuppressionScheduler, TranslationCache,
    WordFrequencyTracker, WordMemory,
};
