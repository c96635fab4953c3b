//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::translation::TranslationProvider;
use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
#[cfg(feature = "web")]
pub fn create_routes<P: TranslationProvider>() -> Router<Arc<AppState<P>>> {
    Router::new()
        .route("/translate", post(translate::<P>))
        .route("/mark_easy", post(mark_easy::<P>))
        .route("/stats", get(get_stats::<P>))
        .route("/health", get(health::<P>))
}
