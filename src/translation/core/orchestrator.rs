//! 选词翻译编排
//!
//! 把抑制过滤、加权选词、频次统计、缓存、速率限制和翻译提供者串成一次完整的请求：
//!
//! 1. 候选词为空时返回 [`TranslationError::NoCandidates`]
//! 2. 过滤掉处于抑制期的单词，全部被过滤时返回 [`TranslationError::AllSuppressed`]
//! 3. 按频次反比加权选出一个单词，并立即增加它的频次
//! 4. 缓存命中直接返回，不占用速率限制配额
//! 5. 未命中时申请速率限制许可，调用提供者前再次检查取消信号
//! 6. 校验译文并写入缓存
//!
//! 取消不是错误：被取消的请求返回 `Ok(None)`，不写缓存，也不计为翻译失败。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::cancel::CancelToken;
use super::limiter::{Admission, RateLimiter};
use super::provider::{validate_translation, TranslationProvider};
use super::selector::WeightedSelector;
use crate::translation::config::constants::PROVIDER_TIMEOUT;
use crate::translation::error::{
    helpers::{log_error, validation_error},
    TranslationError, TranslationResult,
};
use crate::translation::storage::{
    blocking_write, EasyMark, Store, StoreStats, SuppressionScheduler, TranslationCache, WordFrequencyTracker,
};

/// 一次选词翻译的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub word: String,
    pub translation: String,
    pub from_cache: bool,
}

/// 编排选项
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// 关闭后所有候选词都参与选择
    pub suppression_enabled: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            suppression_enabled: true,
        }
    }
}

/// 服务运行统计
///
/// 所有计数器都是原子的，可以在并发请求之间共享。
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// 进入选词流程的请求数
    pub requests: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    /// 实际发出的提供者调用数
    pub provider_calls: AtomicU64,
    pub provider_failures: AtomicU64,
    /// 在等待或调用前被取消的请求数
    pub cancellations: AtomicU64,
    pub words_marked_easy: AtomicU64,
}

impl ServiceStats {
    fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取统计数据快照
    ///
    /// 各字段分别读取，高并发下快照中的字段可能不是同一时刻的值。
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            words_marked_easy: self.words_marked_easy.load(Ordering::Relaxed),
        }
    }
}

/// 统计数据的不可变快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub provider_calls: u64,
    pub provider_failures: u64,
    pub cancellations: u64,
    pub words_marked_easy: u64,
}

impl ServiceStatsSnapshot {
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// 健康状态级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Unhealthy,
}

/// 健康检查报告
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub overall: HealthLevel,
    pub provider: String,
    pub components: HashMap<String, HealthLevel>,
}

/// 选词翻译编排器
pub struct TranslationOrchestrator<P> {
    provider: P,
    limiter: RateLimiter,
    store: Arc<Store>,
    cache: TranslationCache,
    tracker: WordFrequencyTracker,
    scheduler: SuppressionScheduler,
    selector: WeightedSelector,
    options: OrchestratorOptions,
    stats: ServiceStats,
}

impl<P: TranslationProvider> TranslationOrchestrator<P> {
    pub fn new(
        provider: P,
        limiter: RateLimiter,
        store: Arc<Store>,
        options: OrchestratorOptions,
    ) -> Self {
        tracing::info!(
            "翻译编排器已创建: 提供者 '{}'，速率限制 {}，简单词抑制{}",
            provider.name(),
            if limiter.is_enabled() {
                format!("{} 次/{} 秒", limiter.capacity(), limiter.period().as_secs())
            } else {
                "关闭".to_string()
            },
            if options.suppression_enabled { "开启" } else { "关闭" }
        );

        Self {
            provider,
            limiter,
            cache: TranslationCache::new(Arc::clone(&store)),
            tracker: WordFrequencyTracker::new(Arc::clone(&store)),
            scheduler: SuppressionScheduler::new(Arc::clone(&store)),
            store,
            selector: WeightedSelector::new(),
            options,
            stats: ServiceStats::default(),
        }
    }

    /// 从候选词中选出一个并翻译
    ///
    /// 返回 `Ok(None)` 表示请求已被取消。
    pub async fn select_and_translate(
        &self,
        sentence: &str,
        candidates: &[String],
        cancel: &CancelToken,
    ) -> TranslationResult<Option<Selection>> {
        ServiceStats::inc(&self.stats.requests);

        let sentence = validate_sentence(sentence)?;
        if candidates.is_empty() {
            return Err(TranslationError::NoCandidates);
        }

        let eligible = self.eligible_candidates(candidates, chrono::Utc::now().timestamp())?;
        if eligible.is_empty() {
            tracing::info!("{} 个候选词全部处于抑制期", candidates.len());
            return Err(TranslationError::AllSuppressed);
        }

        let chosen = self
            .selector
            .choose(&eligible, &self.tracker)?
            .ok_or(TranslationError::NoCandidates)?;

        self.translate_chosen(sentence, &chosen, cancel).await
    }

    /// 翻译调用方指定的单词，跳过过滤和选词
    pub async fn translate_word(
        &self,
        sentence: &str,
        word: &str,
        cancel: &CancelToken,
    ) -> TranslationResult<Option<Selection>> {
        ServiceStats::inc(&self.stats.requests);

        let sentence = validate_sentence(sentence)?;
        let word = validate_word(word)?;
        self.translate_chosen(sentence, word, cancel).await
    }

    /// 标记单词为简单
    pub fn mark_easy(&self, word: &str) -> TranslationResult<EasyMark> {
        let word = validate_word(word)?;
        let mark = self.scheduler.mark_easy(word)?;
        ServiceStats::inc(&self.stats.words_marked_easy);
        Ok(mark)
    }

    /// 过滤出当前可选的候选词
    ///
    /// 抑制关闭时原样返回。
    pub fn eligible_candidates(
        &self,
        candidates: &[String],
        now: i64,
    ) -> TranslationResult<Vec<String>> {
        if self.options.suppression_enabled {
            self.scheduler.filter_eligible(candidates, now)
        } else {
            Ok(candidates.to_vec())
        }
    }

    /// 取消在这里被吸收为 `Ok(None)`，不会越过编排器的边界
    async fn translate_chosen(
        &self,
        sentence: &str,
        word: &str,
        cancel: &CancelToken,
    ) -> TranslationResult<Option<Selection>> {
        match self.run_translation(sentence, word, cancel).await {
            Ok(selection) => Ok(Some(selection)),
            Err(TranslationError::Cancelled) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn run_translation(
        &self,
        sentence: &str,
        word: &str,
        cancel: &CancelToken,
    ) -> TranslationResult<Selection> {
        // 每次选中都计数，不论之后是否命中缓存或被取消
        let tracker = self.tracker.clone();
        let counted = word.to_string();
        blocking_write(move || tracker.increment(&counted)).await?;

        if let Some(translation) = self.cache.get(sentence, word)? {
            ServiceStats::inc(&self.stats.cache_hits);
            return Ok(Selection {
                word: word.to_string(),
                translation,
                from_cache: true,
            });
        }
        ServiceStats::inc(&self.stats.cache_misses);

        if self.limiter.acquire(cancel).await == Admission::Cancelled {
            return Err(self.cancelled(word, "速率限制等待期间"));
        }
        if cancel.is_cancelled() {
            return Err(self.cancelled(word, "调用提供者之前"));
        }

        ServiceStats::inc(&self.stats.provider_calls);
        let translation = match self.call_provider(sentence, word).await {
            Ok(translation) => translation,
            Err(error) => {
                ServiceStats::inc(&self.stats.provider_failures);
                log_error(&error);
                return Err(error);
            }
        };

        // 译文已经拿到，缓存写入失败只记录日志
        let cache = self.cache.clone();
        let (key_sentence, key_word, value) =
            (sentence.to_string(), word.to_string(), translation.clone());
        if let Err(error) =
            blocking_write(move || cache.set(&key_sentence, &key_word, &value)).await
        {
            log_error(&error.with_context("写入翻译缓存"));
        }

        Ok(Selection {
            word: word.to_string(),
            translation,
            from_cache: false,
        })
    }

    async fn call_provider(&self, sentence: &str, word: &str) -> TranslationResult<String> {
        let reply = tokio::time::timeout(PROVIDER_TIMEOUT, self.provider.translate(sentence, word))
            .await??;
        validate_translation(&reply)
    }

    fn cancelled(&self, word: &str, stage: &str) -> TranslationError {
        ServiceStats::inc(&self.stats.cancellations);
        tracing::info!("[{}] 客户端已断开连接（{}），放弃翻译 '{}'", self.provider.name(), stage, word);
        TranslationError::Cancelled
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    pub fn store_stats(&self) -> TranslationResult<StoreStats> {
        self.store.stats()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn tracker(&self) -> &WordFrequencyTracker {
        &self.tracker
    }

    pub fn scheduler(&self) -> &SuppressionScheduler {
        &self.scheduler
    }

    pub fn options(&self) -> OrchestratorOptions {
        self.options
    }

    /// 检查存储是否可读
    pub fn health_check(&self) -> HealthStatus {
        let storage = match self.store.stats() {
            Ok(_) => HealthLevel::Healthy,
            Err(error) => {
                log_error(&error);
                HealthLevel::Unhealthy
            }
        };

        let mut components = HashMap::new();
        components.insert("storage".to_string(), storage);

        HealthStatus {
            overall: storage,
            provider: self.provider.name().to_string(),
            components,
        }
    }
}

fn validate_sentence(sentence: &str) -> TranslationResult<&str> {
    let sentence = sentence.trim();
    if sentence.is_empty() {
        return Err(validation_error("句子不能为空"));
    }
    Ok(sentence)
}

fn validate_word(word: &str) -> TranslationResult<&str> {
    let word = word.trim();
    if word.is_empty() {
        return Err(validation_error("单词不能为空"));
    }
    Ok(word)
}
