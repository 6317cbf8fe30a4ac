//! 站点信息服务

use crate::{error::AppError, models::site::SiteStatus, repository::SiteRepository};
use sqlx::PgPool;

pub struct SiteService {
    db: PgPool,
}

impl SiteService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 获取站点状态概览
    pub async fn site_status(&self) -> Result<SiteStatus, AppError> {
        let repo = SiteRepository::new(self.db.clone());

        let current_rooms = repo.count_rooms().await?;
        let registered_users = repo.count_users().await?;
        let online_registered_users = repo.count_online(false).await?;
        let online_guests = repo.count_online(true).await?;

        Ok(SiteStatus {
            current_rooms,
            registered_users,
            online_registered_users,
            online_guests,
        })
    }
}
