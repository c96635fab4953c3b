//! 翻译系统核心模块
//!
//! - **cancel**: 协作式取消信号
//! - **limiter**: 滑动窗口速率限制
//! - **selector**: 按频次反比加权的随机选词
//! - **provider**: 外部翻译服务接缝及 HTTP 实现
//! - **orchestrator**: 把以上组件与存储层串成完整的选词翻译流程

pub mod cancel;
pub mod limiter;
pub mod orchestrator;
pub mod provider;
pub mod selector;

pub use cancel::{CancelOnDrop, CancelToken};
pub use limiter::{Admission, RateLimiter};
pub use orchestrator::{
    HealthLevel, HealthStatus, OrchestratorOptions, Selection, ServiceStats,
    ServiceStatsSnapshot, TranslationOrchestrator,
};
pub use provider::{
    build_payload, build_prompt, parse_response, validate_translation, ChatMessage,
    ChatRequest, HttpProvider, TranslationProvider,
};
pub use selector::{inverse_frequency_weights, WeightedSelector};
