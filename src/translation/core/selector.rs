//! 按频次反比加权的随机选词

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::storage::WordFrequencyTracker;

/// 频次 `f` 对应的权重 `1 / (f + 1)`
pub fn inverse_frequency_weights(frequencies: &[u64]) -> Vec<f64> {
    frequencies
        .iter()
        .map(|&frequency| 1.0 / (frequency as f64 + 1.0))
        .collect()
}

/// 加权选择器
///
/// 被选中次数越少的单词越容易被选中。
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedSelector;

impl WeightedSelector {
    pub fn new() -> Self {
        Self
    }

    /// 从候选词中选出一个，空输入返回 `None`
    pub fn choose(
        &self,
        words: &[String],
        tracker: &WordFrequencyTracker,
    ) -> TranslationResult<Option<String>> {
        match words {
            [] => Ok(None),
            [only] => Ok(Some(only.clone())),
            _ => {
                let frequencies = tracker.get_many(words)?;
                self.choose_with(words, &frequencies, &mut rand::thread_rng())
            }
        }
    }

    /// 使用给定频次和随机数生成器选择
    pub fn choose_with<R: Rng + ?Sized>(
        &self,
        words: &[String],
        frequencies: &[u64],
        rng: &mut R,
    ) -> TranslationResult<Option<String>> {
        if words.len() != frequencies.len() {
            return Err(TranslationError::InternalError(format!(
                "候选词数量 {} 与频次数量 {} 不一致",
                words.len(),
                frequencies.len()
            )));
        }
        if words.is_empty() {
            return Ok(None);
        }

        let weights = inverse_frequency_weights(frequencies);
        let distribution = WeightedIndex::new(&weights)
            .map_err(|e| TranslationError::InternalError(format!("权重无效: {}", e)))?;

        let chosen = &words[distribution.sample(rng)];
        tracing::debug!("选中单词: {}", chosen);
        Ok(Some(chosen.clone()))
    }
}
