//! 选词翻译处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json as ExtractJson, State},
    response::{IntoResponse, Json, Response},
};

use super::{error_response, rejection_response, status_for, ApiError};
use crate::translation::{
    dedup_preserving_order,
    error::helpers::{internal_error, log_error},
    CancelToken, TranslationError, TranslationProvider,
};
use crate::web::types::{AppState, TranslateRequest, TranslateResponse};

/// 从句子中选词并翻译
///
/// 翻译在独立任务中执行。客户端断开时 axum 丢弃本处理器的 future，
/// 取消守卫随之触发，任务在速率限制等待或调用提供者之前停止。
/// 被取消的请求返回 204，此时通常已经没有接收方。
#[cfg(feature = "web")]
pub async fn translate<P: TranslationProvider>(
    State(state): State<Arc<AppState<P>>>,
    request: Result<ExtractJson<TranslateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let ExtractJson(request) = request.map_err(rejection_response)?;
    let TranslateRequest {
        sentence,
        candidates,
        word,
    } = request;
    let sentence = sentence.unwrap_or_default();

    let candidates = match candidates {
        Some(candidates) => dedup_preserving_order(candidates),
        None => state.tagger.candidates(&sentence),
    };

    let cancel = CancelToken::new();
    let _guard = cancel.drop_guard();

    let orchestrator = Arc::clone(&state.orchestrator);
    let task = tokio::spawn(async move {
        match word {
            Some(word) => orchestrator.translate_word(&sentence, &word, &cancel).await,
            None => {
                orchestrator
                    .select_and_translate(&sentence, &candidates, &cancel)
                    .await
            }
        }
    });

    let outcome = task.await.map_err(|e| {
        let error = internal_error(format!("翻译任务异常退出: {}", e));
        log_error(&error);
        error_response(&error)
    })?;

    match outcome {
        Ok(Some(selection)) => Ok(Json(TranslateResponse::from(selection)).into_response()),
        Ok(None) => Ok(status_for(&TranslationError::Cancelled).into_response()),
        Err(error) => {
            log_error(&error);
            Err(error_response(&error))
        }
    }
}
