//! 统计和健康检查处理器

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};

use super::{error_response, ApiError};
use crate::translation::{HealthLevel, HealthStatus, TranslationProvider};
use crate::web::types::{AppState, RateLimitStatus, StatsResponse};

/// 获取运行统计
#[cfg(feature = "web")]
pub async fn get_stats<P: TranslationProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let orchestrator = &state.orchestrator;
    let storage = orchestrator.store_stats().map_err(|e| error_response(&e))?;
    let service = orchestrator.stats().snapshot();
    let limiter = orchestrator.limiter();

    Ok(Json(StatsResponse {
        provider: orchestrator.provider().name().to_string(),
        suppression_enabled: orchestrator.options().suppression_enabled,
        cache_hit_rate: service.cache_hit_rate(),
        service,
        storage,
        rate_limit: RateLimitStatus {
            enabled: limiter.is_enabled(),
            capacity: limiter.capacity(),
            period_seconds: limiter.period().as_secs(),
            in_flight: limiter.in_flight().await,
        },
    }))
}

/// 健康检查，存储不可用时返回 503
#[cfg(feature = "web")]
pub async fn health<P: TranslationProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> (StatusCode, Json<HealthStatus>) {
    let status = state.orchestrator.health_check();
    let code = match status.overall {
        HealthLevel::Healthy => StatusCode::OK,
        HealthLevel::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(status))
}
