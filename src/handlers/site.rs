//! 站点信息的 HTTP 处理器

use crate::{error::AppError, middleware::AppState};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 获取站点状态
pub async fn site_status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let status = state.site_service.site_status().await?;

    Ok(Json(status))
}
