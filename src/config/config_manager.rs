// ==========================================
// 互访评估系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::gateway_config::{GatewayConfig, DEFAULT_TIMEOUT_SECS};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 远程存储地址（空或缺失 = 本地模式）
    pub const REMOTE_URL: &str = "gateway.remote_url";
    /// 远程请求超时（秒）
    pub const TIMEOUT_SECS: &str = "gateway.timeout_secs";
    /// 界面/消息语言
    pub const LOCALE: &str = "ui.locale";
}

/// 默认语言
pub const DEFAULT_LOCALE: &str = "th";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key, "配置已更新");
        Ok(())
    }

    /// 删除配置值
    pub fn remove_config_value(&self, key: &str) -> Result<bool, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    /// 获取全部 global 配置
    pub fn list_configs(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }

    // ===== 网关配置 =====

    /// 组装网关连接模式
    ///
    /// # 规则
    /// - gateway.remote_url 缺失或为空 → Local
    /// - 否则 → Remote，超时取 gateway.timeout_secs（非法值回落默认）
    pub fn gateway_config(&self) -> Result<GatewayConfig, Box<dyn Error>> {
        let url = match self.get_config_value(config_keys::REMOTE_URL)? {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => return Ok(GatewayConfig::Local),
        };

        let timeout_secs = match self.get_config_value(config_keys::TIMEOUT_SECS)? {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(value = %raw, "超时配置无效，使用默认值");
                    DEFAULT_TIMEOUT_SECS
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(GatewayConfig::Remote {
            url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// 消息语言
    pub fn locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::LOCALE)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string()))
    }
}
