//! 单词选择频次统计

use std::sync::Arc;

use super::store::Store;
use crate::translation::error::TranslationResult;

/// 记录每个单词被选中翻译的次数
#[derive(Clone)]
pub struct WordFrequencyTracker {
    store: Arc<Store>,
}

impl WordFrequencyTracker {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// 未出现过的单词返回 0
    pub fn get(&self, word: &str) -> TranslationResult<u64> {
        self.store.frequency(word)
    }

    /// 计数加一并返回新值
    ///
    /// 读取和写入在同一个写事务内完成，并发调用不会丢失计数。
    pub fn increment(&self, word: &str) -> TranslationResult<u64> {
        let count = self.store.increment_frequency(word)?;
        tracing::trace!("单词频次: {} = {}", word, count);
        Ok(count)
    }

    /// 批量读取，顺序与输入一致
    pub fn get_many(&self, words: &[String]) -> TranslationResult<Vec<u64>> {
        words.iter().map(|word| self.get(word)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_word_is_zero() {
        let tracker = WordFrequencyTracker::new(Arc::new(Store::in_memory().unwrap()));
        assert_eq!(tracker.get("向日葵").unwrap(), 0);
    }

    #[test]
    fn test_increment_then_get() {
        let tracker = WordFrequencyTracker::new(Arc::new(Store::in_memory().unwrap()));
        tracker.increment("猫").unwrap();
        tracker.increment("猫").unwrap();
        tracker.increment("坐").unwrap();

        let words = vec!["猫".to_string(), "坐".to_string(), "狗".to_string()];
        assert_eq!(tracker.get_many(&words).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(Store::in_memory().unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = WordFrequencyTracker::new(Arc::clone(&store));
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        tracker.increment("猫").unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(WordFrequencyTracker::new(store).get("猫").unwrap(), 400);
    }
}
