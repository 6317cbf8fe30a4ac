//! 用户资料的 HTTP 处理器
//! 路径中的用户ID一律是混淆后的公开ID，进入存储层之前先解码

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::auth::ChangePasswordRequest,
    models::user::UserResponse,
    repository::UserRepository,
    services::AvatarKind,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 获取头像资源（原图或缩略图）
pub async fn get_avatar(
    State(state): State<Arc<AppState>>,
    Path((kind, uid)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let kind: AvatarKind = kind.parse()?;
    let user_id = state.obfuscator.decode(&uid)?;

    let bytes = state.profile_service.get_avatar(kind, user_id).await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

/// 更新当前用户头像
/// multipart 请求携带两个部分：original（裁剪后原图）和 thumbnail（缩略图）
pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut original: Option<Vec<u8>> = None;
    let mut thumbnail: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?;

        match name.as_str() {
            "original" => original = Some(data.to_vec()),
            "thumbnail" => thumbnail = Some(data.to_vec()),
            _ => {}
        }
    }

    let original =
        original.ok_or_else(|| AppError::BadRequest("Missing part: original".to_string()))?;
    let thumbnail =
        thumbnail.ok_or_else(|| AppError::BadRequest("Missing part: thumbnail".to_string()))?;

    state
        .profile_service
        .update_avatar(auth_context.user_id, &original, &thumbnail)
        .await?;

    Ok(Json(json!({"message": "Avatar updated"})))
}

/// 获取用户注册时间
pub async fn registration_time(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = state.obfuscator.decode(&uid)?;

    let registration_time = state.profile_service.registration_time(user_id).await?;

    Ok(Json(json!({"registration_time": registration_time})))
}

/// 修改当前用户密码，返回反映新凭证状态的令牌对
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token_pair = state
        .profile_service
        .change_password(auth_context.user_id, req)
        .await?;

    Ok(Json(token_pair))
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// 列出用户（管理员）
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let repo = UserRepository::new(state.db.clone());
    let users = repo.list(limit, offset).await?;
    let total = repo.count().await?;

    let users: Vec<UserResponse> = users
        .iter()
        .map(|u| UserResponse::new(u, &state.obfuscator))
        .collect();

    Ok(Json(json!({
        "total": total,
        "users": users,
    })))
}
