//! 间隔重复抑制调度
//!
//! 单词每被标记一次“太简单”，等级加一，随后 `等级²` 天内不再被选中。

use std::sync::Arc;

use serde::Serialize;

use super::store::{Store, WordMemory};
use crate::translation::config::constants::SECONDS_PER_DAY;
use crate::translation::error::TranslationResult;

/// 一次标记的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EasyMark {
    pub word: String,
    pub new_level: u32,
    pub suppress_days: u64,
    pub suppress_until: i64,
}

/// 抑制调度器
pub struct SuppressionScheduler {
    store: Arc<Store>,
}

impl SuppressionScheduler {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// 以当前时间标记单词为简单
    pub fn mark_easy(&self, word: &str) -> TranslationResult<EasyMark> {
        self.mark_easy_at(word, chrono::Utc::now().timestamp())
    }

    /// 以指定时间标记单词为简单
    ///
    /// 截止时间至少比上一次大 1 秒，同一秒内的连续标记也保持严格递增。
    pub fn mark_easy_at(&self, word: &str, now: i64) -> TranslationResult<EasyMark> {
        let memory = self.store.update_memory(word, |previous| {
            let level = previous.map(|m| m.level).unwrap_or(0).saturating_add(1);
            let computed = now.saturating_add(suppress_seconds(level));
            let suppress_until = match previous {
                Some(previous) => computed.max(previous.suppress_until.saturating_add(1)),
                None => computed,
            };
            WordMemory {
                level,
                suppress_until,
            }
        })?;

        let mark = EasyMark {
            word: word.to_string(),
            new_level: memory.level,
            suppress_days: suppress_days(memory.level),
            suppress_until: memory.suppress_until,
        };
        tracing::info!(
            "标记简单词: {} 等级 {}，抑制 {} 天",
            mark.word,
            mark.new_level,
            mark.suppress_days
        );
        Ok(mark)
    }

    /// 过滤出当前可选的单词，保持输入顺序
    ///
    /// 从未标记过的单词，或 `suppress_until <= now` 的单词可选。
    pub fn filter_eligible(&self, words: &[String], now: i64) -> TranslationResult<Vec<String>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let suppressed = self.store.suppressed_among(words, now)?;
        if !suppressed.is_empty() {
            tracing::debug!("过滤掉 {} 个处于抑制期的单词", suppressed.len());
        }
        Ok(words
            .iter()
            .filter(|word| !suppressed.contains(*word))
            .cloned()
            .collect())
    }

    pub fn memory(&self, word: &str) -> TranslationResult<Option<WordMemory>> {
        self.store.memory(word)
    }

    /// 清除单词的记忆状态，使其立即可选
    pub fn reset(&self, word: &str) -> TranslationResult<bool> {
        self.store.delete_memory(word)
    }
}

/// 等级对应的抑制天数
pub fn suppress_days(level: u32) -> u64 {
    u64::from(level) * u64::from(level)
}

fn suppress_seconds(level: u32) -> i64 {
    i64::try_from(suppress_days(level))
        .unwrap_or(i64::MAX)
        .saturating_mul(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn scheduler() -> SuppressionScheduler {
        SuppressionScheduler::new(Arc::new(Store::in_memory().unwrap()))
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_levels_and_days_grow_quadratically() {
        let scheduler = scheduler();

        let marks: Vec<_> = (0..4)
            .map(|_| scheduler.mark_easy_at("猫", NOW).unwrap())
            .collect();

        let levels: Vec<_> = marks.iter().map(|m| m.new_level).collect();
        let days: Vec<_> = marks.iter().map(|m| m.suppress_days).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        assert_eq!(days, vec![1, 4, 9, 16]);
        assert_eq!(marks[0].suppress_until, NOW + SECONDS_PER_DAY);
    }

    #[test]
    fn test_suppress_until_strictly_increases() {
        let scheduler = scheduler();
        let first = scheduler.mark_easy_at("猫", NOW + 10 * SECONDS_PER_DAY).unwrap();
        // 时钟回拨后的标记仍然要晚于上一次的截止时间
        let second = scheduler.mark_easy_at("猫", NOW).unwrap();

        assert_eq!(second.new_level, 2);
        assert!(second.suppress_until > first.suppress_until);
    }

    #[test]
    fn test_filter_eligible_boundary() {
        let scheduler = scheduler();
        let mark = scheduler.mark_easy_at("猫", NOW).unwrap();
        let candidates = words(&["猫", "坐", "向日葵"]);

        assert_eq!(
            scheduler.filter_eligible(&candidates, NOW).unwrap(),
            words(&["坐", "向日葵"])
        );
        assert_eq!(
            scheduler.filter_eligible(&candidates, mark.suppress_until - 1).unwrap(),
            words(&["坐", "向日葵"])
        );
        assert_eq!(
            scheduler.filter_eligible(&candidates, mark.suppress_until).unwrap(),
            candidates
        );
    }

    #[test]
    fn test_filter_eligible_empty_input() {
        assert!(scheduler().filter_eligible(&[], NOW).unwrap().is_empty());
    }

    #[test]
    fn test_reset_makes_word_eligible() {
        let scheduler = scheduler();
        scheduler.mark_easy_at("猫", NOW).unwrap();
        assert!(scheduler.reset("猫").unwrap());
        assert_eq!(scheduler.filter_eligible(&words(&["猫"]), NOW).unwrap(), words(&["猫"]));
        assert!(scheduler.memory("猫").unwrap().is_none());
    }
}
