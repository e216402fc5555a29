// ==========================================
// 互访评估系统 - 排程数据仓储
// ==========================================
// 职责: ScheduleEntry ⇄ 网关 JSON 记录
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::schedule::ScheduleEntry;
use crate::repository::error::GatewayResult;
use crate::repository::gateway::{PersistenceGateway, RecordKind};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct ScheduleRepository {
    gateway: Arc<dyn PersistenceGateway>,
}

impl ScheduleRepository {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// 读取全部排程（无法解析的记录跳过并告警）
    pub async fn list(&self) -> GatewayResult<Vec<ScheduleEntry>> {
        let raw = self.gateway.list(RecordKind::Schedule).await?;
        let mut entries = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value::<ScheduleEntry>(value.clone()) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(error = %e, record = %value, "跳过无法解析的排程记录"),
            }
        }
        Ok(entries)
    }

    /// 按日期查询
    pub async fn find_by_date(&self, date: NaiveDate) -> GatewayResult<Option<ScheduleEntry>> {
        Ok(self.list().await?.into_iter().find(|e| e.date() == date))
    }

    /// 保存（同日期整体替换）
    pub async fn upsert(&self, entry: &ScheduleEntry) -> GatewayResult<()> {
        let record = serde_json::to_value(entry)?;
        self.gateway.upsert(RecordKind::Schedule, record).await
    }
}
