//! 翻译提供者
//!
//! [`TranslationProvider`] 是核心流程与外部翻译服务之间的接缝。
//! [`HttpProvider`] 调用 OpenAI chat completions 兼容接口。

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::translation::config::constants::{MAX_TRANSLATION_CHARS, PROVIDER_TIMEOUT};
use crate::translation::config::ProviderConfig;
use crate::translation::error::{
    helpers::{config_error, response_error},
    TranslationError, TranslationResult,
};

/// 外部翻译能力
pub trait TranslationProvider: Send + Sync + 'static {
    /// 提供者名称，用于日志
    fn name(&self) -> &str;

    /// 翻译句子中的目标词
    fn translate(
        &self,
        sentence: &str,
        word: &str,
    ) -> impl Future<Output = TranslationResult<String>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// 构造用户提示词
pub fn build_prompt(sentence: &str, word: &str) -> String {
    format!("翻译下面句子中的「{}」：{}", word, sentence)
}

/// 构造请求体
///
/// 不支持 system 角色的服务把系统提示词拼接在用户消息之前。
pub fn build_payload(config: &ProviderConfig, prompt: &str) -> ChatRequest {
    let messages = if config.use_system_role {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: config.system_prompt.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ]
    } else {
        vec![ChatMessage {
            role: "user".to_string(),
            content: format!("{}\n\n---\n\n{}", config.system_prompt, prompt),
        }]
    };

    ChatRequest {
        model: config.model.clone(),
        messages,
    }
}

/// 从响应体中取出 `choices[0].message.content`
pub fn parse_response(body: &str) -> TranslationResult<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| response_error(format!("响应结构无法识别: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| response_error("响应中没有 choices[0].message.content"))
}

/// 校验译文：去除首尾空白后不能为空，且不超过 30 个字符
pub fn validate_translation(text: &str) -> TranslationResult<String> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(TranslationError::RejectedTranslation("译文为空".to_string()));
    }

    let length = trimmed.chars().count();
    if length > MAX_TRANSLATION_CHARS {
        return Err(TranslationError::RejectedTranslation(format!(
            "译文过长（{} 个字符）: {}",
            length, trimmed
        )));
    }

    Ok(trimmed.to_string())
}

/// 基于 HTTP 的翻译提供者
pub struct HttpProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(config: ProviderConfig) -> TranslationResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .default_headers(config.headers.clone());

        // 只使用配置文件中的代理，忽略 HTTP_PROXY 等系统环境变量
        builder = match &config.proxy {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy)
                    .map_err(|e| config_error(format!("代理地址无效 '{}': {}", proxy, e)))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| config_error(format!("无法创建 HTTP 客户端: {}", e)))?;

        tracing::info!(
            "翻译提供者 '{}' 已就绪: {} ({})",
            config.name,
            config.api_url,
            config.model
        );

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl TranslationProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn translate(&self, sentence: &str, word: &str) -> TranslationResult<String> {
        let prompt = build_prompt(sentence, word);
        let payload = build_payload(&self.config, &prompt);

        let mut request = self.client.post(&self.config.api_url).json(&payload);
        if self.config.sends_api_key() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("[{}] 调用 API 失败: {}", self.config.name, e);
            TranslationError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(response_error(format!("上游返回状态码 {}: {}", status, snippet)));
        }

        let body = response.text().await?;
        let content = parse_response(&body)?;
        let translation = validate_translation(&content)?;

        tracing::debug!("[{}] {} -> {}", self.config.name, word, translation);
        Ok(translation)
    }
}
