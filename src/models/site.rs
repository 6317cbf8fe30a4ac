//! 站点信息模型

use serde::Serialize;

/// 站点状态概览
#[derive(Debug, Serialize)]
pub struct SiteStatus {
    /// 当前房间数
    pub current_rooms: i64,
    /// 注册用户数
    pub registered_users: i64,
    /// 在线注册用户数
    pub online_registered_users: i64,
    /// 在线游客数
    pub online_guests: i64,
}
