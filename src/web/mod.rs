//! Web 服务器模块
//!
//! 通过 HTTP 暴露选词翻译和简单词标记

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::translation::{TranslationError, TranslationProvider, TranslationResult};

/// Web 服务器
pub struct WebServer<P> {
    config: WebConfig,
    state: Arc<AppState<P>>,
}

impl<P: TranslationProvider> WebServer<P> {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, state: AppState<P>) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        create_router(Arc::clone(&self.state))
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> TranslationResult<()> {
        let address = self.config.listen_address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| TranslationError::ConfigError(format!("无法绑定 {}: {}", address, e)))?;

        tracing::info!("Web server starting at http://{}", address);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| TranslationError::InternalError(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器
pub fn create_router<P: TranslationProvider>(app_state: Arc<AppState<P>>) -> Router {
    create_routes::<P>()
        .with_state(app_state)
        // 添加CORS支持
        .layer(CorsLayer::permissive())
}
