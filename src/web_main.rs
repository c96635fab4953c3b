//! Web 服务器主程序入口

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::fmt;

use translens::env::{self as translens_env, EnvVar};
use translens::translation::{
    ConfigManager, HttpProvider, OrchestratorOptions, RateLimiter, Store,
    TranslationOrchestrator,
};
use translens::web::{AppState, WebConfig, WebServer};

/// Translens Web Server
#[derive(Debug, Parser)]
#[command(name = "translens-web", version, about = "自适应选词翻译服务")]
struct Args {
    /// 配置文件路径，缺省时按搜索路径查找
    #[arg(short, long)]
    config: Option<String>,

    /// 绑定地址
    #[arg(short, long)]
    bind: Option<String>,

    /// 端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 数据库文件路径
    #[arg(long)]
    db: Option<String>,

    /// 生成示例配置文件后退出
    #[arg(long, value_name = "PATH")]
    generate_config: Option<String>,
}

fn init_logging() {
    let level = translens_env::core::LogLevel::get()
        .ok()
        .and_then(|level| level.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);

    fmt().with_max_level(level).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();

    if let Some(path) = args.generate_config {
        ConfigManager::generate_example_config(&path)?;
        println!("示例配置已写入 {}", path);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => ConfigManager::from_path(path)?,
        None => ConfigManager::new()?,
    };

    match config.source() {
        Some(path) => tracing::info!("配置来源: {}", path.display()),
        None => tracing::info!("配置来源: 内置字符串"),
    }
    tracing::info!("已配置的提供者: {}", config.provider_names().join(", "));

    let provider_config = config.active_provider()?;
    let limiter = RateLimiter::from_config(&provider_config);
    let provider = HttpProvider::new(provider_config)?;

    let db_path = args.db.unwrap_or_else(|| config.database_path());
    let store = Arc::new(Store::open(&db_path)?);
    tracing::info!("数据库: {}", db_path);

    let options = OrchestratorOptions {
        suppression_enabled: config.suppression_enabled(),
    };
    let orchestrator = TranslationOrchestrator::new(provider, limiter, store, options);

    let mut web_config = WebConfig::default();
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }
    web_config.validate()?;

    let server = WebServer::new(web_config, AppState::new(orchestrator));
    server.start().await?;

    Ok(())
}
