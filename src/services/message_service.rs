//! 系统消息服务
//! 启动时从资源文件加载本地化消息文本，供接口与前端查询

use crate::error::AppError;
use std::collections::HashMap;

pub struct MessageService {
    messages: HashMap<String, String>,
}

impl MessageService {
    /// 从 JSON 资源文件加载消息表
    pub fn load(path: &str) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read system messages from {}: {}", path, e))
        })?;

        let messages: HashMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid system messages file {}: {}", path, e))
        })?;

        tracing::info!(count = messages.len(), "System messages loaded");

        Ok(Self { messages })
    }

    /// 获取指定消息，{0}、{1} 等占位符用参数替换。
    /// 未知消息代号返回空字符串
    pub fn get(&self, msg_id: &str, args: &[&str]) -> String {
        let mut message = match self.messages.get(msg_id) {
            Some(m) => m.clone(),
            None => return String::new(),
        };

        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{}}}", i), arg);
        }

        message
    }

    /// 完整消息表
    pub fn all(&self) -> &HashMap<String, String> {
        &self.messages
    }
}
