// ==========================================
// 互访评估系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、网关连接设置、消息语言切换
// 说明: 网关模式变更在下次启动（重建 AppState）时生效
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::config::GatewayConfig;
use crate::i18n;

/// 配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询所有配置（按 key 排序）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let mut items: Vec<ConfigItem> = self
            .config_manager
            .list_configs()
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(|(key, value)| ConfigItem { key, value })
            .collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(items)
    }

    /// 当前配置的网关连接模式
    pub fn gateway_config(&self) -> ApiResult<GatewayConfig> {
        self.config_manager
            .gateway_config()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 设置/清除远程存储地址
    ///
    /// # 参数
    /// - url: Some(http/https 地址) 切换远程模式；None 切回本地模式
    pub fn set_remote_url(&self, url: Option<&str>) -> ApiResult<()> {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ApiError::InvalidInput(format!("远程地址必须为 http(s): {}", url)));
                }
                self.set(config_keys::REMOTE_URL, url)?;
                tracing::info!(url, "远程存储地址已更新");
            }
            None => {
                self.config_manager
                    .remove_config_value(config_keys::REMOTE_URL)
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
                tracing::info!("远程存储地址已清除，切回本地模式");
            }
        }
        Ok(())
    }

    /// 设置远程请求超时（秒）
    pub fn set_timeout_secs(&self, secs: u64) -> ApiResult<()> {
        if secs == 0 {
            return Err(ApiError::InvalidInput("超时必须大于 0".to_string()));
        }
        self.set(config_keys::TIMEOUT_SECS, &secs.to_string())
    }

    /// 切换消息语言（立即生效并持久化）
    pub fn set_locale(&self, locale: &str) -> ApiResult<()> {
        if !i18n::is_supported(locale) {
            return Err(ApiError::InvalidInput(format!("不支持的语言: {}", locale)));
        }
        self.set(config_keys::LOCALE, locale)?;
        i18n::set_locale(locale);
        Ok(())
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.config_manager
            .set_config_value(key, value)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }
}
