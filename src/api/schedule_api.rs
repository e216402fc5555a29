// ==========================================
// 互访评估系统 - 访问排程 API
// ==========================================
// 职责: 排程查询、实时校验提示、保存（阻断式校验）
// 红线: 校验不通过不得写入；编辑既有日期时历史中剔除该日期
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::api::validator::{ScheduleSaveValidator, ValidationMode};
use crate::domain::schedule::{ScheduleDraft, ScheduleEntry};
use crate::domain::types::Facility;
use crate::engine::schedule_validator::QuotaRule;
use crate::repository::ScheduleRepository;

/// 按月分组的排程
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<ScheduleEntry>,
}

// ==========================================
// ScheduleApi
// ==========================================
pub struct ScheduleApi {
    schedule_repo: Arc<ScheduleRepository>,
    validator: ScheduleSaveValidator,
}

impl ScheduleApi {
    pub fn new(schedule_repo: Arc<ScheduleRepository>) -> Self {
        Self::with_quota_rule(schedule_repo, QuotaRule::default())
    }

    pub fn with_quota_rule(schedule_repo: Arc<ScheduleRepository>, quota_rule: QuotaRule) -> Self {
        Self {
            schedule_repo,
            validator: ScheduleSaveValidator::new(quota_rule),
        }
    }

    /// 全部排程（按日期升序）
    pub async fn list_schedules(&self) -> ApiResult<Vec<ScheduleEntry>> {
        let mut entries = self.schedule_repo.list().await?;
        entries.sort_by_key(|e| e.date());
        Ok(entries)
    }

    /// 指定日期的排程
    pub async fn entry_for_date(&self, date: NaiveDate) -> ApiResult<Option<ScheduleEntry>> {
        Ok(self.schedule_repo.find_by_date(date).await?)
    }

    /// 载入日期对应的编辑草稿（无排程时为空白草稿）
    pub async fn draft_for_date(&self, date: NaiveDate) -> ApiResult<ScheduleDraft> {
        Ok(self
            .entry_for_date(date)
            .await?
            .map(|entry| ScheduleDraft::from(&entry))
            .unwrap_or_else(|| ScheduleDraft::new(date)))
    }

    /// 实时校验提示（不阻断编辑）
    ///
    /// # 返回
    /// - Ok(Vec<ValidationViolation>): 主办出访 / 同日重复 / 轮换配额 提示
    pub async fn preview(&self, draft: &ScheduleDraft) -> ApiResult<Vec<ValidationViolation>> {
        let history = self.history_excluding(draft.date).await?;
        self.validator.check(draft, &history, ValidationMode::Advisory)
    }

    /// 保存排程
    ///
    /// # 返回
    /// - Ok(ScheduleEntry): 已保存的排程（同日期整体替换）
    /// - Err(ApiError::ValidationFailed): 带全部违规，未写入
    /// - Err(ApiError::TransportError / RemoteRejected): 写入失败，可重试
    pub async fn save(&self, draft: &ScheduleDraft) -> ApiResult<ScheduleEntry> {
        tracing::info!(date = %draft.date, host = ?draft.host, team_size = draft.team_size(), "保存排程");

        let history = self.history_excluding(draft.date).await?;
        self.validator.check(draft, &history, ValidationMode::Strict)?;

        let host = draft
            .host
            .ok_or_else(|| ApiError::InvalidInput("主办机构未选择".to_string()))?;
        let entry = ScheduleEntry::new(draft.date, host, draft.slots)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        self.schedule_repo.upsert(&entry).await?;
        tracing::info!(date = %entry.date(), host = %host.code(), "排程已保存");
        Ok(entry)
    }

    /// 查询主办机构在指定日期接待的访问小组
    pub async fn visiting_team(&self, host: Facility, date: NaiveDate) -> ApiResult<Vec<Facility>> {
        Ok(self
            .entry_for_date(date)
            .await?
            .filter(|entry| entry.host() == host)
            .map(|entry| entry.visitors().collect())
            .unwrap_or_default())
    }

    /// 按年月分组（组内及组间均按日期升序）
    pub fn group_by_month(entries: &[ScheduleEntry]) -> Vec<MonthGroup> {
        let mut groups: BTreeMap<(i32, u32), Vec<ScheduleEntry>> = BTreeMap::new();
        for entry in entries {
            let date = entry.date();
            groups.entry((date.year(), date.month())).or_default().push(entry.clone());
        }

        groups
            .into_iter()
            .map(|((year, month), mut entries)| {
                entries.sort_by_key(|e| e.date());
                MonthGroup { year, month, entries }
            })
            .collect()
    }

    async fn history_excluding(&self, date: NaiveDate) -> ApiResult<Vec<ScheduleEntry>> {
        Ok(self
            .schedule_repo
            .list()
            .await?
            .into_iter()
            .filter(|entry| entry.date() != date)
            .collect())
    }
}
