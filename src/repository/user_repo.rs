//! User repository (数据库访问层)

use crate::{error::AppError, models::user::User};
use sqlx::{PgPool, Row};

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据用户名查找用户
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1"
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 创建用户
    pub async fn create(
        &self,
        username: &str,
        salt: &str,
        password_hash: &str,
        roles: &[String],
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, salt, password_hash, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(username)
        .bind(salt)
        .bind(password_hash)
        .bind(roles)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新凭证：盐、哈希在一条语句中一起落库，同时令牌纪元 +1，
    /// 使密码变更前签发的所有令牌失效
    pub async fn update_credentials(
        &self,
        id: i64,
        salt: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                salt = $2,
                password_hash = $3,
                token_epoch = token_epoch + 1
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(salt)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 列出用户
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY create_time DESC LIMIT $1 OFFSET $2"
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// 统计用户数量
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }
}
