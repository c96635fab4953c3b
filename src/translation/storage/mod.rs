//! 存储模块
//!
//! 持久化存储以及建立在其上的缓存、频次和记忆组件。

pub mod cache;
pub mod frequency;
pub mod memory;
pub mod store;

pub use cache::{cache_key, CacheStats, TranslationCache};
pub use frequency::WordFrequencyTracker;
pub use memory::{suppress_days, EasyMark, SuppressionScheduler};
pub use store::{CacheEntry, Store, StoreStats, WordMemory};

use crate::translation::error::{helpers::internal_error, TranslationResult};

/// 在阻塞线程池中执行存储写入
///
/// redb 提交写事务时会刷盘，不能占用异步运行时的工作线程。
pub async fn blocking_write<T, F>(write: F) -> TranslationResult<T>
where
    F: FnOnce() -> TranslationResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(write)
        .await
        .map_err(|e| internal_error(format!("存储写入任务异常退出: {}", e)))?
}
