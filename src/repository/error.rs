// ==========================================
// 互访评估系统 - 持久化网关错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 远程读失败由网关内部降级；写失败必须以错误返回
// ==========================================

use thiserror::Error;

/// 持久化网关错误类型
#[derive(Error, Debug)]
pub enum GatewayError {
    // ===== 本地存储错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("本地数据损坏 (namespace={namespace}): {message}")]
    CorruptLocalData { namespace: String, message: String },

    // ===== 远程存储错误 =====
    #[error("远程请求失败 (action={action}): {message}")]
    Transport { action: String, message: String },

    #[error("远程存储拒绝写入 (action={action}): {body}")]
    RemoteRejected { action: String, body: String },

    // ===== 数据错误 =====
    #[error("序列化失败: {0}")]
    Serialization(String),

    #[error("记录缺少主键字段: {0}")]
    MissingRecordKey(String),

    // ===== 配置错误 =====
    #[error("网关配置无效: {0}")]
    InvalidConfig(String),
}

impl From<rusqlite::Error> for GatewayError {
    fn from(err: rusqlite::Error) -> Self {
        GatewayError::DatabaseQueryError(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

/// Result 类型别名
pub type GatewayResult<T> = Result<T, GatewayError>;
