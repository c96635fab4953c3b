//! 分层配置管理器
//!
//! 配置文件由三部分组成：顶层字段、`[default]` 默认配置节、`[providers.<name>]` 提供者配置节。
//! 每个字段都按 提供者配置节 → 默认配置节 → 内置默认值 的顺序解析。
//!
//! ```toml
//! provider = "deepseek"
//!
//! [default]
//! system_prompt = "你是一名翻译，只输出译文。"
//! rate_limit_period_seconds = 60
//!
//! [providers.deepseek]
//! api_url = "https://api.deepseek.com/chat/completions"
//! model = "deepseek-chat"
//! api_key = "${DEEPSEEK_API_KEY}"
//! rate_limit_count = 20
//!
//! [providers.deepseek.headers]
//! X-Client = "translens"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::{self, EnvVar};
use crate::translation::error::{helpers::config_error, TranslationError, TranslationResult};

/// 提供者配置节（同时用作 `[default]` 默认配置节）
///
/// 所有字段都是可选的，缺省时回退到下一层。
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProviderProfile {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub use_system_role: Option<bool>,
    pub system_prompt: Option<String>,
    pub proxy: Option<String>,
    pub rate_limit_count: Option<usize>,
    pub rate_limit_period_seconds: Option<u64>,
    pub headers: BTreeMap<String, String>,
}

/// 配置文件的原始结构
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RawConfig {
    /// 默认使用的提供者名称
    pub provider: Option<String>,
    /// 是否启用“太简单”单词抑制
    pub suppression_enabled: Option<bool>,
    /// 数据库文件路径
    pub database_path: Option<String>,
    pub default: ProviderProfile,
    pub providers: BTreeMap<String, ProviderProfile>,
}

/// 解析完成的提供者配置
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub api_url: String,
    pub model: String,
    pub api_key: String,
    pub use_system_role: bool,
    pub system_prompt: String,
    pub proxy: Option<String>,
    pub headers: HeaderMap,
    /// 每个周期内允许的最大请求数，0 表示不限制
    pub rate_limit_count: usize,
    pub rate_limit_period: Duration,
}

/// 三级回退：提供者配置节的值 → 默认配置节的值 → 内置默认值
pub fn resolve<T>(profile_value: Option<T>, default_value: Option<T>, fallback: T) -> T {
    profile_value.or(default_value).unwrap_or(fallback)
}

/// 环境变量替换，支持 `$VAR` 和 `${VAR}`，未定义的变量保持原样
pub fn expand_env(value: &str) -> String {
    shellexpand::env_with_context_no_errors(value, |name| std::env::var(name).ok()).into_owned()
}

impl ProviderConfig {
    /// 从原始配置中解析指定提供者
    pub fn from_raw(raw: &RawConfig, name: &str) -> TranslationResult<Self> {
        let profile = raw.providers.get(name).ok_or_else(|| {
            config_error(format!("在配置文件中未找到名为 '[providers.{}]' 的配置节", name))
        })?;
        let default = &raw.default;

        let text = |profile_value: &Option<String>, default_value: &Option<String>, fallback: &str| {
            expand_env(&resolve(
                profile_value.clone(),
                default_value.clone(),
                fallback.to_string(),
            ))
        };

        let proxy = resolve(
            profile.proxy.clone().map(Some),
            default.proxy.clone().map(Some),
            None,
        )
        .map(|proxy| expand_env(&proxy))
        .filter(|proxy| !proxy.trim().is_empty());

        // 默认配置节的请求头先写入，提供者配置节的同名请求头覆盖它
        let mut header_pairs = default.headers.clone();
        header_pairs.extend(profile.headers.clone());

        let config = Self {
            name: name.to_string(),
            api_url: text(&profile.api_url, &default.api_url, ""),
            model: text(&profile.model, &default.model, constants::DEFAULT_MODEL),
            api_key: text(&profile.api_key, &default.api_key, ""),
            use_system_role: resolve(profile.use_system_role, default.use_system_role, true),
            system_prompt: text(&profile.system_prompt, &default.system_prompt, ""),
            proxy,
            headers: build_headers(&header_pairs)?,
            rate_limit_count: resolve(
                profile.rate_limit_count,
                default.rate_limit_count,
                constants::DEFAULT_RATE_LIMIT_COUNT,
            ),
            rate_limit_period: Duration::from_secs(resolve(
                profile.rate_limit_period_seconds,
                default.rate_limit_period_seconds,
                constants::DEFAULT_RATE_LIMIT_PERIOD_SECS,
            )),
        };

        config.validate()?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(config_error(format!("提供者 '{}' 缺少 api_url", self.name)));
        }

        if self.rate_limit_count > 0 && self.rate_limit_period.is_zero() {
            return Err(config_error(format!(
                "提供者 '{}' 启用了速率限制，但周期为 0 秒",
                self.name
            )));
        }

        Ok(())
    }

    /// 是否需要发送 Authorization 头
    pub fn sends_api_key(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != constants::NO_KEY_REQUIRED
    }
}

/// 把配置中的请求头映射为 HeaderMap，在加载时完成校验
fn build_headers(pairs: &BTreeMap<String, String>) -> TranslationResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(pairs.len());

    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| config_error(format!("无效的请求头名称 '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(&expand_env(value))
            .map_err(|e| config_error(format!("请求头 '{}' 的值无效: {}", name, e)))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    raw: RawConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 加载 .env 后按搜索路径查找配置文件
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();

        if let Ok(path) = env::provider::ConfigPath::get() {
            return Self::from_path(&path);
        }

        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                return Self::from_path(expanded_path.as_ref());
            }
        }

        Err(config_error(format!(
            "未找到配置文件，已搜索: {}",
            constants::CONFIG_PATHS.join(", ")
        )))
    }

    /// 从指定文件加载配置
    pub fn from_path<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        Self::load_dotenv();

        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("读取配置文件 {} 失败: {}", path.display(), e)))?;

        tracing::info!("加载配置文件: {}", path.display());

        let mut manager = Self::from_toml_str(&content)?;
        manager.source = Some(path.to_path_buf());
        Ok(manager)
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> TranslationResult<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: RawConfig) -> Self {
        Self { raw, source: None }
    }

    /// 获取原始配置
    pub fn raw(&self) -> &RawConfig {
        &self.raw
    }

    /// 配置文件路径（从字符串构建时为空）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 当前使用的提供者：环境变量 → 配置文件 → 内置默认值
    pub fn active_provider_name(&self) -> String {
        env::provider::Provider::get().unwrap_or_else(|_| {
            resolve(
                None,
                self.raw.provider.as_deref().map(expand_env),
                constants::DEFAULT_PROVIDER.to_string(),
            )
        })
    }

    /// 解析当前提供者的配置
    pub fn active_provider(&self) -> TranslationResult<ProviderConfig> {
        self.provider_config(&self.active_provider_name())
    }

    /// 解析指定提供者的配置
    pub fn provider_config(&self, name: &str) -> TranslationResult<ProviderConfig> {
        ProviderConfig::from_raw(&self.raw, name)
            .map_err(|e: TranslationError| e.with_context(format!("provider={}", name)))
    }

    /// 是否启用单词抑制：环境变量 → 配置文件 → 启用
    pub fn suppression_enabled(&self) -> bool {
        env::features::SuppressionEnabled::get()
            .ok()
            .or(self.raw.suppression_enabled)
            .unwrap_or(true)
    }

    /// 数据库路径：环境变量 → 配置文件 → 内置默认值
    pub fn database_path(&self) -> String {
        env::storage::DatabasePath::get().unwrap_or_else(|_| {
            resolve(
                None,
                self.raw.database_path.as_deref().map(expand_env),
                constants::DEFAULT_DATABASE_FILE.to_string(),
            )
        })
    }

    /// 已配置的提供者名称
    pub fn provider_names(&self) -> Vec<&str> {
        self.raw.providers.keys().map(String::as_str).collect()
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 示例配置
    pub fn example_config() -> RawConfig {
        let mut providers = BTreeMap::new();
        providers.insert(
            constants::DEFAULT_PROVIDER.to_string(),
            ProviderProfile {
                api_url: Some("http://127.0.0.1:8080/v1/chat/completions".to_string()),
                api_key: Some(constants::NO_KEY_REQUIRED.to_string()),
                use_system_role: Some(false),
                ..Default::default()
            },
        );
        providers.insert(
            "deepseek".to_string(),
            ProviderProfile {
                api_url: Some("https://api.deepseek.com/chat/completions".to_string()),
                model: Some("deepseek-chat".to_string()),
                api_key: Some("${DEEPSEEK_API_KEY}".to_string()),
                rate_limit_count: Some(20),
                ..Default::default()
            },
        );

        RawConfig {
            provider: Some(constants::DEFAULT_PROVIDER.to_string()),
            suppression_enabled: Some(true),
            database_path: Some(constants::DEFAULT_DATABASE_FILE.to_string()),
            default: ProviderProfile {
                system_prompt: Some(
                    "你是一名翻译。只输出目标词语在句中语境下的英文译文，不要解释。".to_string(),
                ),
                rate_limit_count: Some(constants::DEFAULT_RATE_LIMIT_COUNT),
                rate_limit_period_seconds: Some(constants::DEFAULT_RATE_LIMIT_PERIOD_SECS),
                ..Default::default()
            },
            providers,
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let body = toml::to_string_pretty(&Self::example_config())
            .map_err(|e| config_error(format!("序列化配置失败: {}", e)))?;
        let content = format!(
            "# Translens 配置文件\n\
             # 字段按 [providers.<name>] → [default] → 内置默认值 的顺序解析\n\
             # 字符串值支持 $VAR / ${{VAR}} 环境变量替换\n\n{}",
            body
        );

        std::fs::write(path, content)
            .map_err(|e| config_error(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
