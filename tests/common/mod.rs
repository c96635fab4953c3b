// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use translens::translation::{
    OrchestratorOptions, RateLimiter, Store, TranslationError, TranslationOrchestrator,
    TranslationProvider, TranslationResult,
};

/// 假翻译提供者的行为
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum FakeBehavior {
    /// 查词典，查不到时返回 `<word>`
    Dictionary(HashMap<String, String>),
    /// 总是返回固定文本
    Fixed(String),
    /// 总是失败
    Fail(TranslationError),
}

/// 不访问网络的翻译提供者，记录每次调用
pub struct FakeProvider {
    behavior: FakeBehavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// 常用词典：猫、坐、向日葵
    pub fn dictionary() -> Self {
        let entries = [("猫", "cat"), ("坐", "sit"), ("向日葵", "sunflower")]
            .into_iter()
            .map(|(word, translation)| (word.to_string(), translation.to_string()))
            .collect();
        Self::new(FakeBehavior::Dictionary(entries))
    }

    pub fn fixed(reply: &str) -> Self {
        Self::new(FakeBehavior::Fixed(reply.to_string()))
    }

    pub fn failing(error: TranslationError) -> Self {
        Self::new(FakeBehavior::Fail(error))
    }

    /// 每次调用前等待
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 收到的 (句子, 单词) 请求
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl TranslationProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn translate(&self, sentence: &str, word: &str) -> TranslationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((sentence.to_string(), word.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            FakeBehavior::Dictionary(entries) => Ok(entries
                .get(word)
                .cloned()
                .unwrap_or_else(|| format!("<{}>", word))),
            FakeBehavior::Fixed(reply) => Ok(reply.clone()),
            FakeBehavior::Fail(error) => Err(error.clone()),
        }
    }
}

/// 测试环境设置
pub struct TestEnvironment {
    pub store: Arc<Store>,
    pub orchestrator: Arc<TranslationOrchestrator<FakeProvider>>,
}

#[allow(dead_code)]
impl TestEnvironment {
    /// 内存存储、不限速、开启抑制
    pub fn new(provider: FakeProvider) -> Self {
        Self::build(provider, RateLimiter::unlimited(), OrchestratorOptions::default())
    }

    pub fn with_limiter(provider: FakeProvider, limiter: RateLimiter) -> Self {
        Self::build(provider, limiter, OrchestratorOptions::default())
    }

    pub fn build(provider: FakeProvider, limiter: RateLimiter, options: OrchestratorOptions) -> Self {
        let store = Arc::new(Store::in_memory().expect("内存数据库应能创建"));
        let orchestrator = Arc::new(TranslationOrchestrator::new(
            provider,
            limiter,
            Arc::clone(&store),
            options,
        ));
        Self { store, orchestrator }
    }

    pub fn provider(&self) -> &FakeProvider {
        self.orchestrator.provider()
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new(FakeProvider::dictionary())
    }
}

/// 测试数据生成器
pub struct TestDataGenerator;

#[allow(dead_code)]
impl TestDataGenerator {
    pub const SENTENCE: &'static str = "猫坐在垂头的向日葵旁";

    pub fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    /// 标注器对示例句子给出的候选词
    pub fn sentence_candidates() -> Vec<String> {
        Self::words(&["猫", "坐", "向日葵"])
    }
}
