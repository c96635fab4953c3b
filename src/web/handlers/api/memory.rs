//! 简单词标记处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json as ExtractJson, State},
    response::Json,
};

use super::{error_response, rejection_response, ApiError};
use crate::translation::{
    error::helpers::{internal_error, log_error},
    TranslationProvider,
};
use crate::web::types::{AppState, MarkEasyRequest, MarkEasyResponse};

/// 标记单词为简单，返回新的等级和抑制天数
///
/// 写事务提交时会刷盘，放到阻塞线程池中执行。
#[cfg(feature = "web")]
pub async fn mark_easy<P: TranslationProvider>(
    State(state): State<Arc<AppState<P>>>,
    request: Result<ExtractJson<MarkEasyRequest>, JsonRejection>,
) -> Result<Json<MarkEasyResponse>, ApiError> {
    let ExtractJson(request) = request.map_err(rejection_response)?;
    let word = request.word.unwrap_or_default();

    let orchestrator = Arc::clone(&state.orchestrator);
    let outcome = tokio::task::spawn_blocking(move || orchestrator.mark_easy(&word))
        .await
        .map_err(|e| {
            let error = internal_error(format!("标记任务异常退出: {}", e));
            log_error(&error);
            error_response(&error)
        })?;

    match outcome {
        Ok(mark) => Ok(Json(MarkEasyResponse::from(mark))),
        Err(error) => {
            log_error(&error);
            Err(error_response(&error))
        }
    }
}
