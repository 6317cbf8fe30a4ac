//! 用户资料服务：头像、注册时间、密码修改

use crate::{
    auth::hashid::IdObfuscator,
    auth::jwt::{JwtService, TokenPair},
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::auth::ChangePasswordRequest,
    repository::UserRepository,
};
use sqlx::PgPool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// 头像类型：原图或缩略图，对应存储目录名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarKind {
    Originals,
    Thumbnails,
}

impl AvatarKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            AvatarKind::Originals => "originals",
            AvatarKind::Thumbnails => "thumbnails",
        }
    }
}

impl FromStr for AvatarKind {
    type Err = AppError;

    // 未知类型按资源不存在处理
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "originals" => Ok(AvatarKind::Originals),
            "thumbnails" => Ok(AvatarKind::Thumbnails),
            _ => Err(AppError::NotFound),
        }
    }
}

pub struct ProfileService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    obfuscator: Arc<IdObfuscator>,
    config: Arc<AppConfig>,
}

impl ProfileService {
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

    fn avatar_path(&self, kind: AvatarKind, file_name: &str) -> PathBuf {
        PathBuf::from(&self.config.resources.avatars_dir)
            .join(kind.dir_name())
            .join(file_name)
    }

    /// 读取头像，没有上传过头像的用户返回默认图
    pub async fn get_avatar(&self, kind: AvatarKind, user_id: i64) -> Result<Vec<u8>, AppError> {
        let path = self.avatar_path(kind, &format!("{}.jpg", user_id));

        let path = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            path
        } else {
            self.avatar_path(kind, "default.jpg")
        };

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound
            } else {
                tracing::error!(path = %path.display(), "Failed to read avatar: {}", e);
                AppError::Internal(format!("Failed to read avatar: {}", e))
            }
        })
    }

    /// 更新头像：裁剪后的原图与缩略图一起写入
    pub async fn update_avatar(
        &self,
        user_id: i64,
        original: &[u8],
        thumbnail: &[u8],
    ) -> Result<(), AppError> {
        for (kind, data) in [
            (AvatarKind::Originals, original),
            (AvatarKind::Thumbnails, thumbnail),
        ] {
            let path = self.avatar_path(kind, &format!("{}.jpg", user_id));

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Internal(format!("Failed to create avatar directory: {}", e))
                })?;
            }

            tokio::fs::write(&path, data).await.map_err(|e| {
                tracing::error!(path = %path.display(), "Failed to write avatar: {}", e);
                AppError::Internal(format!("Failed to write avatar: {}", e))
            })?;
        }

        tracing::info!(user_id, "Avatar updated");
        Ok(())
    }

    /// 获取用户注册时间，格式 yyyy/MM/dd
    pub async fn registration_time(&self, user_id: i64) -> Result<String, AppError> {
        let user = UserRepository::new(self.db.clone())
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(user.create_time.format("%Y/%m/%d").to_string())
    }

    /// 修改密码
    ///
    /// 新盐 + 新哈希 + 令牌纪元递增在一条更新中落库，随后立刻签发
    /// 反映新状态的令牌对返回给调用方。
    pub async fn change_password(
        &self,
        user_id: i64,
        req: ChangePasswordRequest,
    ) -> Result<TokenPair, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let hasher = PasswordHasher::new();
        hasher.verify(&req.old_password, &user.salt, &user.password_hash)?;

        if req.new_password.chars().count() < self.config.security.password_min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                self.config.security.password_min_length
            )));
        }

        // 永不复用旧盐
        let new_salt = PasswordHasher::generate_salt();
        let new_hash = hasher.hash(&req.new_password, &new_salt)?;

        let updated = user_repo
            .update_credentials(user_id, &new_salt, &new_hash)
            .await?
            .ok_or(AppError::Unauthorized)?;

        tracing::info!(user_id, "Password changed, token epoch bumped");

        self.jwt_service.issue_token_pair(
            &self.obfuscator.encode(updated.id),
            &updated.username,
            updated.roles(),
            updated.token_epoch,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_kind_parse() {
        assert_eq!("originals".parse::<AvatarKind>().unwrap(), AvatarKind::Originals);
        assert_eq!("thumbnails".parse::<AvatarKind>().unwrap(), AvatarKind::Thumbnails);
        assert!("..".parse::<AvatarKind>().is_err());
        assert!("banner".parse::<AvatarKind>().is_err());
    }
}
