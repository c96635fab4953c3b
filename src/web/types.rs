//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::translation::{
    CandidateTagger, DelimitedTagger, EasyMark, Selection, ServiceStatsSnapshot, StoreStats,
    TranslationOrchestrator,
};

/// 应用状态
pub struct AppState<P> {
    pub orchestrator: Arc<TranslationOrchestrator<P>>,
    pub tagger: Arc<dyn CandidateTagger>,
}

impl<P> AppState<P> {
    pub fn new(orchestrator: TranslationOrchestrator<P>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            tagger: Arc::new(DelimitedTagger::new()),
        }
    }

    /// 替换候选词提取器
    pub fn with_tagger(mut self, tagger: Arc<dyn CandidateTagger>) -> Self {
        self.tagger = tagger;
        self
    }
}

/// 翻译请求
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    /// 缺省或为 null 时按空句子处理，由编排器报告输入错误
    #[serde(default)]
    pub sentence: Option<String>,
    /// 已由外部标注器提取的候选词，缺省时使用服务端提取器
    #[serde(default)]
    pub candidates: Option<Vec<String>>,
    /// 指定要翻译的单词，跳过过滤和选词
    #[serde(default)]
    pub word: Option<String>,
}

/// 翻译响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub target_word: String,
    pub translation: String,
    pub from_cache: bool,
}

impl From<Selection> for TranslateResponse {
    fn from(selection: Selection) -> Self {
        Self {
            target_word: selection.word,
            translation: selection.translation,
            from_cache: selection.from_cache,
        }
    }
}

/// 标记简单词请求
#[derive(Debug, Deserialize)]
pub struct MarkEasyRequest {
    #[serde(default)]
    pub word: Option<String>,
}

/// 标记简单词响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MarkEasyResponse {
    pub status: String,
    pub word: String,
    pub new_level: u32,
    pub suppress_days: u64,
}

impl From<EasyMark> for MarkEasyResponse {
    fn from(mark: EasyMark) -> Self {
        Self {
            status: "success".to_string(),
            word: mark.word,
            new_level: mark.new_level,
            suppress_days: mark.suppress_days,
        }
    }
}

/// 速率限制状态
#[derive(Debug, Serialize)]
pub struct RateLimitStatus {
    pub enabled: bool,
    pub capacity: usize,
    pub period_seconds: u64,
    pub in_flight: usize,
}

/// 统计响应
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub provider: String,
    pub suppression_enabled: bool,
    pub service: ServiceStatsSnapshot,
    pub cache_hit_rate: f64,
    pub storage: StoreStats,
    pub rate_limit: RateLimitStatus,
}
