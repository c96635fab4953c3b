//! 翻译管道模块
//!
//! 候选词进入编排器之前的预处理

pub mod tagger;

// 重新导出主要类型
pub use tagger::{dedup_preserving_order, CandidateTagger, DelimitedTagger};
