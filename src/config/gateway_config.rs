// ==========================================
// 互访评估系统 - 网关连接模式
// ==========================================
// 显式传入网关工厂，不读取任何全局状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认远程请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 网关连接模式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayConfig {
    /// 仅本地存储
    #[default]
    Local,
    /// 远程存储（排程读失败回退本地）
    Remote { url: String, timeout: Duration },
}

impl GatewayConfig {
    pub fn remote(url: impl Into<String>) -> Self {
        GatewayConfig::Remote {
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, GatewayConfig::Remote { .. })
    }
}
