//! 静态资源的 HTTP 处理器

use crate::middleware::AppState;
use axum::{extract::State, Json};
use std::collections::HashMap;
use std::sync::Arc;

/// 获取系统消息表（前端本地化提示用）
pub async fn system_messages(
    State(state): State<Arc<AppState>>,
) -> Json<HashMap<String, String>> {
    Json(state.message_service.all().clone())
}
