//! 候选词提取
//!
//! 真正的词性标注器位于进程之外，这里只定义接口和一个按分隔符切分的默认实现。

use std::collections::HashSet;

/// 从句子中提取候选词（名词、动词）
pub trait CandidateTagger: Send + Sync {
    fn candidates(&self, sentence: &str) -> Vec<String>;
}

/// 功能性词汇，不作为候选词
const FUNCTIONAL_WORDS: &[&str] = &[
    "的", "了", "在", "是", "和", "与", "或", "也", "就", "都", "而", "及", "着", "过", "吗", "呢",
    "吧", "啊", "a", "an", "the", "and", "or", "of", "to", "in", "on", "at", "is", "are", "be",
];

/// 按空白和标点切分的提取器
///
/// 适用于已经分好词的输入，例如 `"猫 坐 在 向日葵 旁"`。
#[derive(Debug, Clone)]
pub struct DelimitedTagger {
    functional_words: HashSet<String>,
}

impl DelimitedTagger {
    pub fn new() -> Self {
        Self {
            functional_words: FUNCTIONAL_WORDS.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    fn is_delimiter(c: char) -> bool {
        c.is_whitespace() || c.is_ascii_punctuation() || is_cjk_punctuation(c)
    }
}

impl Default for DelimitedTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateTagger for DelimitedTagger {
    fn candidates(&self, sentence: &str) -> Vec<String> {
        let tokens = sentence
            .split(Self::is_delimiter)
            .filter(|token| !token.is_empty())
            .filter(|token| !self.functional_words.contains(&token.to_lowercase()))
            .filter(|token| token.chars().any(char::is_alphabetic))
            .map(str::to_string);

        dedup_preserving_order(tokens)
    }
}

/// 去重并保持首次出现的顺序
pub fn dedup_preserving_order<I>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    words
        .into_iter()
        .map(|word| word.trim().to_string())
        .filter(|word| !word.is_empty())
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

fn is_cjk_punctuation(c: char) -> bool {
    matches!(
        c,
        '，' | '。' | '、' | '；' | '：' | '？' | '！' | '“' | '”' | '‘' | '’' | '（' | '）'
            | '《' | '》' | '「' | '」' | '【' | '】' | '…' | '—' | '·'
    )
}
