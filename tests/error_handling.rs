//! 错误处理集成测试

use std::time::Duration;

use translens::translation::config::ConfigManager;
use translens::translation::{CancelToken, ErrorCategory, TranslationError};

mod common {
    include!("common/mod.rs");
}

use common::{FakeProvider, TestDataGenerator, TestEnvironment};

/// 上游失败向调用方传播，且不写缓存
#[tokio::test]
async fn test_provider_errors_propagate_and_are_not_cached() {
    let failures = [
        TranslationError::NetworkError("connection refused".to_string()),
        TranslationError::ResponseError("上游返回状态码 500".to_string()),
    ];

    for failure in failures {
        let env = TestEnvironment::new(FakeProvider::failing(failure.clone()));
        let result = env
            .orchestrator
            .translate_word(TestDataGenerator::SENTENCE, "猫", &CancelToken::new())
            .await;

        let error = result.expect_err("上游失败应返回错误");
        assert_eq!(error.category(), ErrorCategory::Provider);
        assert_eq!(error.to_string(), failure.to_string());
        assert_eq!(env.store.stats().unwrap().cache_entries, 0);
        assert_eq!(env.orchestrator.stats().snapshot().provider_failures, 1);
    }
}

/// 失败后不会自动重试，下一次请求重新调用提供者
#[tokio::test]
async fn test_no_automatic_retry() {
    let env = TestEnvironment::new(FakeProvider::failing(TranslationError::NetworkError(
        "reset".to_string(),
    )));

    for _ in 0..2 {
        let _ = env
            .orchestrator
            .translate_word(TestDataGenerator::SENTENCE, "猫", &CancelToken::new())
            .await;
    }

    assert_eq!(env.provider().calls(), 2);
}

/// 过长的译文被拒绝
#[tokio::test]
async fn test_overlong_translation_rejected() {
    let env = TestEnvironment::new(FakeProvider::fixed(&"a".repeat(31)));

    let result = env
        .orchestrator
        .translate_word(TestDataGenerator::SENTENCE, "猫", &CancelToken::new())
        .await;

    assert!(matches!(result, Err(TranslationError::RejectedTranslation(_))));
    assert_eq!(env.store.stats().unwrap().cache_entries, 0);
}

/// 恰好 30 个字符的译文可以接受
#[tokio::test]
async fn test_thirty_characters_accepted() {
    let reply = "向".repeat(30);
    let env = TestEnvironment::new(FakeProvider::fixed(&reply));

    let selection = env
        .orchestrator
        .translate_word(TestDataGenerator::SENTENCE, "猫", &CancelToken::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(selection.translation, reply);
}

/// 提供者超过 30 秒未响应时超时
#[tokio::test(start_paused = true)]
async fn test_provider_deadline() {
    let env = TestEnvironment::new(FakeProvider::dictionary().with_delay(Duration::from_secs(31)));

    let result = env
        .orchestrator
        .translate_word(TestDataGenerator::SENTENCE, "猫", &CancelToken::new())
        .await;

    assert!(matches!(result, Err(TranslationError::TimeoutError(_))));
    assert_eq!(env.store.stats().unwrap().cache_entries, 0);
}

/// 空白输入是调用方错误
#[tokio::test]
async fn test_blank_input() {
    let env = TestEnvironment::default();
    let cancel = CancelToken::new();

    let blank_word = env
        .orchestrator
        .translate_word(TestDataGenerator::SENTENCE, "  ", &cancel)
        .await;
    assert!(matches!(blank_word, Err(TranslationError::InvalidInput(_))));

    let blank_sentence = env
        .orchestrator
        .select_and_translate("", &TestDataGenerator::sentence_candidates(), &cancel)
        .await;
    assert!(matches!(blank_sentence, Err(TranslationError::InvalidInput(_))));

    assert!(matches!(
        env.orchestrator.mark_easy(""),
        Err(TranslationError::InvalidInput(_))
    ));
    assert_eq!(env.provider().calls(), 0);
}

/// 配置错误在加载时暴露
#[test]
fn test_config_errors() {
    let missing_url = ConfigManager::from_toml_str(
        r#"
        provider = "broken"

        [providers.broken]
        model = "x"
        "#,
    )
    .unwrap();
    let error = missing_url.provider_config("broken").unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Configuration);

    let unknown = missing_url.provider_config("nowhere").unwrap_err();
    assert!(matches!(unknown, TranslationError::ConfigError(_)));

    assert!(matches!(
        ConfigManager::from_toml_str("provider = ["),
        Err(TranslationError::ConfigError(_))
    ));
}
