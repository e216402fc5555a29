// ==========================================
// 互访评估系统 - 持久化网关接口
// ==========================================
// 职责: list(kind) / upsert(kind, record) 的统一接口
// 实现者: LocalStore（SQLite key/value）、RemoteStore（HTTP + 本地回退）
// 红线: 网关不含业务逻辑，只负责读写序列化后的记录
// ==========================================

use crate::repository::error::{GatewayError, GatewayResult};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

// ==========================================
// RecordKind - 记录类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Schedule,
    Assessment,
}

impl RecordKind {
    /// 远程读取动作
    pub fn read_action(self) -> &'static str {
        match self {
            RecordKind::Schedule => "getSchedules",
            RecordKind::Assessment => "getAssessments",
        }
    }

    /// 远程写入动作
    pub fn write_action(self) -> &'static str {
        match self {
            RecordKind::Schedule => "saveSchedule",
            RecordKind::Assessment => "saveAssessment",
        }
    }

    /// 本地存储命名空间
    pub fn namespace(self) -> &'static str {
        match self {
            RecordKind::Schedule => "visit.schedules",
            RecordKind::Assessment => "visit.assessments",
        }
    }

    /// upsert 判重字段（排程按日期唯一，评估按ID唯一）
    pub fn key_field(self) -> &'static str {
        match self {
            RecordKind::Schedule => "date",
            RecordKind::Assessment => "id",
        }
    }

    /// 取记录主键
    pub fn record_key(self, record: &Value) -> GatewayResult<String> {
        record
            .get(self.key_field())
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GatewayError::MissingRecordKey(self.key_field().to_string()))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Schedule => write!(f, "SCHEDULE"),
            RecordKind::Assessment => write!(f, "ASSESSMENT"),
        }
    }
}

// ==========================================
// PersistenceGateway Trait
// ==========================================
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// 网关模式名（日志使用）
    fn mode_name(&self) -> &'static str;

    /// 读取某类全部记录
    ///
    /// # 降级
    /// - 远程读失败: 排程回退本地，评估返回空
    async fn list(&self, kind: RecordKind) -> GatewayResult<Vec<Value>>;

    /// 写入（按主键替换或追加）
    ///
    /// # 失败
    /// - 任何写失败都以 Err 返回，不重试、不转写本地
    async fn upsert(&self, kind: RecordKind, record: Value) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_key() {
        let schedule = json!({"id": "2025-01-01", "date": "2025-01-01"});
        assert_eq!(RecordKind::Schedule.record_key(&schedule).unwrap(), "2025-01-01");
        assert!(RecordKind::Assessment.record_key(&json!({"date": "x"})).is_err());
    }

    #[test]
    fn test_actions_and_namespaces_are_distinct() {
        assert_ne!(RecordKind::Schedule.namespace(), RecordKind::Assessment.namespace());
        assert_eq!(RecordKind::Schedule.read_action(), "getSchedules");
        assert_eq!(RecordKind::Assessment.write_action(), "saveAssessment");
    }
}
