// ==========================================
// 互访评估系统 - 评估记录仓储
// ==========================================
// 职责: AssessmentRecord ⇄ 网关 JSON 记录
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::assessment::AssessmentRecord;
use crate::repository::error::GatewayResult;
use crate::repository::gateway::{PersistenceGateway, RecordKind};
use std::sync::Arc;

pub struct AssessmentRepository {
    gateway: Arc<dyn PersistenceGateway>,
}

impl AssessmentRepository {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// 读取全部评估记录（无法解析的记录跳过并告警）
    pub async fn list(&self) -> GatewayResult<Vec<AssessmentRecord>> {
        let raw = self.gateway.list(RecordKind::Assessment).await?;
        let mut records = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value::<AssessmentRecord>(value.clone()) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, record = %value, "跳过无法解析的评估记录"),
            }
        }
        Ok(records)
    }

    /// 保存评估记录
    pub async fn insert(&self, record: &AssessmentRecord) -> GatewayResult<()> {
        let value = serde_json::to_value(record)?;
        self.gateway.upsert(RecordKind::Assessment, value).await
    }
}
