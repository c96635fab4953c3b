//! 翻译配置管理模块
//!
//! 提供分层的配置管理：提供者配置节、默认配置节和内置默认值，
//! 所有字符串值支持环境变量替换

pub mod manager;

// 重新导出主要类型
pub use manager::{expand_env, resolve, ConfigManager, ProviderConfig, ProviderProfile, RawConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 提供者相关
    pub const DEFAULT_PROVIDER: &str = "local_llama";
    pub const DEFAULT_MODEL: &str = "default";
    pub const NO_KEY_REQUIRED: &str = "no-key-required";
    pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

    // 速率限制相关（0 表示不限制）
    pub const DEFAULT_RATE_LIMIT_COUNT: usize = 0;
    pub const DEFAULT_RATE_LIMIT_PERIOD_SECS: u64 = 60;

    // 译文校验
    pub const MAX_TRANSLATION_CHARS: usize = 30;

    // 遗忘曲线
    pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

    // 存储
    pub const DEFAULT_DATABASE_FILE: &str = "translens_data.db";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "translens.toml",
        "config.toml",
        ".translens.toml",
        "~/.config/translens/translens.toml",
        "/etc/translens/translens.toml",
    ];
}
