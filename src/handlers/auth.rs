//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::auth::{LoginRequest, RefreshTokenRequest, RegisterRequest},
};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.auth_service.register(req).await?;

    Ok(Json(response))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.auth_service.login(req).await?;

    Ok(Json(response))
}

/// 刷新令牌
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token_pair = state.auth_service.refresh_token(req).await?;

    Ok(Json(token_pair))
}

/// 获取当前用户信息
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        // 对外只暴露混淆后的公开ID
        "id": state.obfuscator.encode(auth_context.user_id),
        "username": auth_context.username,
        "roles": auth_context.roles,
    })))
}
