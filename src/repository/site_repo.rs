//! 站点统计查询（房间数、注册用户数、在线连接数）

use crate::error::AppError;
use sqlx::{PgPool, Row};

pub struct SiteRepository {
    db: PgPool,
}

impl SiteRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 当前房间数
    pub async fn count_rooms(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM chat_rooms")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }

    /// 注册用户数
    pub async fn count_users(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }

    /// 在线连接数，按注册用户/游客区分
    pub async fn count_online(&self, is_guest: bool) -> Result<i64, AppError> {
        let count: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) FROM connections
            WHERE is_online AND NOT is_deleted AND is_guest = $1
            "#,
        )
        .bind(is_guest)
        .fetch_one(&self.db)
        .await?
        .get(0);

        Ok(count)
    }
}
