// ==========================================
// 互访评估系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换网关错误为用户可读的错误消息
// 约定: 所有阻断类错误必须带完整违规列表
// ==========================================

use crate::domain::types::Facility;
use crate::repository::error::GatewayError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 校验类错误（阻断保存）
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 保存前校验失败（带全部违规）
    #[error("校验失败: {reason}")]
    ValidationFailed {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    /// 评分未填完且未确认
    #[error("评分未填完: 缺少 {} 项", .unrated.len())]
    IncompleteAssessment { unrated: Vec<String> },

    // ==========================================
    // 传输类错误（可恢复）
    // ==========================================
    #[error("远程存储不可用: {0}")]
    TransportError(String),

    #[error("远程存储拒绝写入: {0}")]
    RemoteRejected(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 违规列表（非校验类错误返回空）
    pub fn violations(&self) -> &[ValidationViolation] {
        match self {
            ApiError::ValidationFailed { violations, .. } => violations,
            _ => &[],
        }
    }
}

// ==========================================
// 从 GatewayError 转换
// ==========================================
impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport { action, message } => {
                ApiError::TransportError(format!("{}: {}", action, message))
            }
            GatewayError::RemoteRejected { action, body } => {
                ApiError::RemoteRejected(format!("{}: {}", action, body))
            }
            GatewayError::LockError(msg) => ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg)),
            GatewayError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            e @ GatewayError::CorruptLocalData { .. } => ApiError::DatabaseError(e.to_string()),
            GatewayError::InvalidConfig(msg) => ApiError::ConfigError(msg),
            GatewayError::Serialization(msg) => ApiError::InternalError(format!("序列化失败: {}", msg)),
            GatewayError::MissingRecordKey(field) => {
                ApiError::InternalError(format!("记录缺少主键字段: {}", field))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================

/// 校验违规详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// 违规类型（HOST_MISSING / TEAM_SIZE / HOST_IN_TEAM / DUPLICATE_VISITOR / VISIT_QUOTA_EXCEEDED）
    pub violation_type: String,
    /// 涉及机构
    pub facility: Option<Facility>,
    /// 违规原因（已本地化）
    pub reason: String,
}
