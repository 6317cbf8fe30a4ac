//! 路由注册
//! 创建所有 API 路由并应用中间件
//!
//! 每个受保护路由组在这里静态声明允许的角色集，由共享的
//! require_roles 中间件统一检查，不在各个 handler 里散落判断。

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use crate::{
    auth,
    handlers,
    middleware::AppState,
    models::role::Role,
};

/// 允许角色集：空集表示任何已认证用户
const ANY_AUTHENTICATED: &[Role] = &[];
const REGISTERED: &[Role] = &[Role::User, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// 头像上传体积上限
const BODY_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查、站点信息、静态资源）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/site/status", get(handlers::site::site_status))
        .route(
            "/api/resources/system-messages",
            get(handlers::resources::system_messages),
        )
        .route(
            "/api/resources/avatars/{kind}/{uid}",
            get(handlers::user::get_avatar),
        );

    // 认证路由（无需令牌）
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh_token));

    // 任何已认证用户均可访问
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_current_user))
        .route("/api/users/me/password", put(handlers::user::change_password))
        .route("/api/users/me/avatar", post(handlers::user::update_avatar))
        .layer(axum::middleware::from_fn_with_state(
            ANY_AUTHENTICATED,
            auth::middleware::require_roles,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::jwt_auth_middleware,
        ));

    // 仅注册用户（游客不可见）
    let registered_routes = Router::new()
        .route(
            "/api/users/{uid}/registration-time",
            get(handlers::user::registration_time),
        )
        .layer(axum::middleware::from_fn_with_state(
            REGISTERED,
            auth::middleware::require_roles,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::jwt_auth_middleware,
        ));

    // 管理员
    let admin_routes = Router::new()
        .route("/api/admin/users", get(handlers::user::list_users))
        .layer(axum::middleware::from_fn_with_state(
            ADMIN_ONLY,
            auth::middleware::require_roles,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::jwt_auth_middleware,
        ));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(authenticated_routes)
        .merge(registered_routes)
        .merge(admin_routes)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
