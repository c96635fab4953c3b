//! 翻译缓存模块
//!
//! 以 (句子, 目标词) 为键的持久化缓存。同一个词在不同句子中的翻译互不影响。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::store::{CacheEntry, Store};
use crate::translation::error::TranslationResult;

/// 缓存统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_entries: u64,
}

impl CacheStats {
    /// 命中率，没有请求时为 0
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

/// 计算缓存键
///
/// 对 `sentence + "|" + word` 做 blake3 哈希，输出十六进制字符串。
/// 分隔符保证 ("ab", "c") 与 ("a", "bc") 得到不同的键。
pub fn cache_key(sentence: &str, word: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(sentence.as_bytes());
    hasher.update(b"|");
    hasher.update(word.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// 翻译缓存
///
/// 克隆后共享同一个存储和命中计数。
#[derive(Clone)]
pub struct TranslationCache {
    store: Arc<Store>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl TranslationCache {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 查询缓存，未命中返回 `None`
    pub fn get(&self, sentence: &str, word: &str) -> TranslationResult<Option<String>> {
        let key = cache_key(sentence, word);
        let entry = self.store.cache_entry(&key)?;

        match entry {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("缓存命中: {}", word);
                Ok(Some(entry.translation))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    /// 写入缓存，同键覆盖
    pub fn set(&self, sentence: &str, word: &str, translation: &str) -> TranslationResult<()> {
        let entry = CacheEntry {
            key: cache_key(sentence, word),
            sentence: sentence.to_string(),
            word: word.to_string(),
            translation: translation.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        };
        self.store.put_cache_entry(&entry)?;
        tracing::debug!("缓存写入: {} -> {}", word, translation);
        Ok(())
    }

    /// 删除一条缓存，返回条目是否存在
    pub fn invalidate(&self, sentence: &str, word: &str) -> TranslationResult<bool> {
        self.store.delete_cache_entry(&cache_key(sentence, word))
    }

    /// 读取完整条目
    pub fn entry(&self, sentence: &str, word: &str) -> TranslationResult<Option<CacheEntry>> {
        self.store.cache_entry(&cache_key(sentence, word))
    }

    pub fn stats(&self) -> TranslationResult<CacheStats> {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        Ok(CacheStats {
            total_requests: hits + misses,
            cache_hits: hits,
            cache_misses: misses,
            total_entries: self.store.stats()?.cache_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TranslationCache {
        TranslationCache::new(Arc::new(Store::in_memory().unwrap()))
    }

    #[test]
    fn test_cache_key_is_hex_and_stable() {
        let key = cache_key("猫坐在垂头的向日葵旁", "猫");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_key("猫坐在垂头的向日葵旁", "猫"));
    }

    #[test]
    fn test_cache_key_separator() {
        assert_ne!(cache_key("ab", "c"), cache_key("a", "bc"));
    }

    #[test]
    fn test_same_word_different_sentence() {
        let cache = cache();
        cache.set("猫坐着", "猫", "cat").unwrap();

        assert_eq!(cache.get("猫坐着", "猫").unwrap().as_deref(), Some("cat"));
        assert_eq!(cache.get("猫跑了", "猫").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = cache();
        cache.set("s", "w", "first").unwrap();
        cache.set("s", "w", "second").unwrap();

        assert_eq!(cache.get("s", "w").unwrap().as_deref(), Some("second"));
        assert_eq!(cache.stats().unwrap().total_entries, 1);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = cache();
        cache.get("s", "w").unwrap();
        cache.set("s", "w", "t").unwrap();
        cache.get("s", "w").unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalidate() {
        let cache = cache();
        cache.set("s", "w", "t").unwrap();
        assert!(cache.invalidate("s", "w").unwrap());
        assert_eq!(cache.get("s", "w").unwrap(), None);
        assert!(cache.entry("s", "w").unwrap().is_none());
    }
}
