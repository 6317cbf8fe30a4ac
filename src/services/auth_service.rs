//! 认证服务：注册、登录、令牌刷新

use crate::{
    auth::hashid::IdObfuscator,
    auth::jwt::{JwtService, TokenPair},
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::auth::{LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest},
    models::role::Role,
    models::user::{User, UserResponse},
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    obfuscator: Arc<IdObfuscator>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        db: PgPool,
        jwt_service: Arc<JwtService>,
        obfuscator: Arc<IdObfuscator>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            jwt_service,
            obfuscator,
            config,
        }
    }

    /// 用户注册：生成独立盐和哈希，建立凭证，返回首个令牌对
    pub async fn register(&self, req: RegisterRequest) -> Result<LoginResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        if req.password.chars().count() < self.config.security.password_min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                self.config.security.password_min_length
            )));
        }

        if user_repo.find_by_username(&req.username).await?.is_some() {
            return Err(AppError::BadRequest("Username is already taken".to_string()));
        }

        let hasher = PasswordHasher::new();
        let salt = PasswordHasher::generate_salt();
        let password_hash = hasher.hash(&req.password, &salt)?;

        let user = user_repo
            .create(
                &req.username,
                &salt,
                &password_hash,
                &[Role::User.as_str().to_string()],
            )
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        self.login_response(&user)
    }

    /// 用户登录
    ///
    /// 用户不存在与密码错误返回同一个错误，响应中不携带任何
    /// 可用于用户枚举的信号。
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user: User = user_repo
            .find_by_username(&req.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let hasher = PasswordHasher::new();
        hasher.verify(&req.password, &user.salt, &user.password_hash)?;

        tracing::info!(user_id = user.id, "User logged in");

        self.login_response(&user)
    }

    /// 刷新令牌：验证刷新令牌、重新读取用户并比对令牌纪元，
    /// 然后签发全新的令牌对。旧刷新令牌不做服务端追踪
    pub async fn refresh_token(&self, req: RefreshTokenRequest) -> Result<TokenPair, AppError> {
        let claims = self.jwt_service.validate_refresh_token(&req.refresh_token)?;

        let user_id = self
            .obfuscator
            .decode(&claims.sub)
            .map_err(|_| AppError::Unauthorized)?;

        let user_repo = UserRepository::new(self.db.clone());
        let user: User = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if claims.epoch != user.token_epoch {
            tracing::debug!(user_id, "Refresh token epoch is stale");
            return Err(AppError::Unauthorized);
        }

        self.issue_pair(&user)
    }

    /// 为用户签发令牌对
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        self.jwt_service.issue_token_pair(
            &self.obfuscator.encode(user.id),
            &user.username,
            user.roles(),
            user.token_epoch,
        )
    }

    fn login_response(&self, user: &User) -> Result<LoginResponse, AppError> {
        let pair = self.issue_pair(user)?;

        Ok(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            user: UserResponse::new(user, &self.obfuscator),
        })
    }
}
