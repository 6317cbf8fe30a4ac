//! JWT 认证中间件与授权检查

use crate::{error::AppError, middleware::AppState, models::role::Role, repository::UserRepository};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<Role>,
    pub token_epoch: i32,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .ok_or(AppError::Unauthorized)
}

/// JWT 认证中间件
///
/// 验证访问令牌，解码 sub 中的公开ID，并与存储中的令牌纪元比对：
/// 密码变更后纪元递增，旧令牌即使未到期也会在这里被拒绝。
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers())?;

    let claims = state.jwt_service.validate_access_token(&token)?;

    // sub 解码失败属于认证失败，而不是资源不存在
    let user_id = state
        .obfuscator
        .decode(&claims.sub)
        .map_err(|_| AppError::Unauthorized)?;

    let user = UserRepository::new(state.db.clone())
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if claims.epoch != user.token_epoch {
        tracing::debug!(user_id, "Token epoch is stale, rejecting");
        return Err(AppError::Unauthorized);
    }

    let auth_context = AuthContext {
        user_id,
        username: claims.username,
        roles: claims.roles,
        token_epoch: claims.epoch,
    };

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// 授权判定：允许集为空表示任何已认证用户均可访问，
/// 否则要求角色交集非空。纯函数，不触发任何副作用
pub fn role_gate(user_roles: &[Role], allowed: &[Role]) -> bool {
    allowed.is_empty() || user_roles.iter().any(|role| allowed.contains(role))
}

/// 角色检查中间件
///
/// 每个受保护路由组注册时静态声明允许的角色集，由这里统一检查。
/// 必须挂在认证中间件之后：令牌无效时走 401，角色不足才是 403。
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    if !role_gate(&auth_context.roles, allowed) {
        tracing::warn!(
            user_id = auth_context.user_id,
            roles = ?auth_context.roles,
            ?allowed,
            "Role gate denied access"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer test_token_123".parse().unwrap());

        let token = extract_token(&headers).unwrap();
        assert_eq!(token, "test_token_123");
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_err());
    }

    #[test]
    fn test_extract_token_invalid_format() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "InvalidFormat".parse().unwrap());

        assert!(extract_token(&headers).is_err());
    }

    #[test]
    fn test_role_gate_empty_allowed_grants_any_authenticated() {
        assert!(role_gate(&[Role::User], &[]));
        assert!(role_gate(&[Role::Guest], &[]));
        assert!(role_gate(&[], &[]));
    }

    #[test]
    fn test_role_gate_requires_intersection() {
        assert!(!role_gate(&[Role::User], &[Role::Admin]));
        assert!(role_gate(&[Role::User, Role::Admin], &[Role::Admin]));
        assert!(role_gate(&[Role::User], &[Role::User, Role::Admin]));
        assert!(!role_gate(&[], &[Role::User]));
    }
}
