// ==========================================
// 互访评估系统 - 总览 API
// ==========================================
// 职责: 评估结果与排程的聚合统计（只读）
// - 各机构平均总分（四舍五入，降序）
// - 等级分布
// - 排程按日期升序
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::api::error::ApiResult;
use crate::domain::assessment::AssessmentRecord;
use crate::domain::schedule::ScheduleEntry;
use crate::domain::types::{Facility, Grade};
use crate::repository::{AssessmentRepository, ScheduleRepository};

/// 机构平均分
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityAverage {
    pub hospital: Facility,
    pub average_score: u32,
    pub assessment_count: usize,
}

/// 等级计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeCount {
    pub grade: Grade,
    pub count: usize,
}

/// 总览数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub facility_averages: Vec<FacilityAverage>,
    pub grade_distribution: Vec<GradeCount>,
    pub schedules: Vec<ScheduleEntry>,
    pub assessment_count: usize,
}

pub struct DashboardApi {
    schedule_repo: Arc<ScheduleRepository>,
    assessment_repo: Arc<AssessmentRepository>,
}

impl DashboardApi {
    pub fn new(schedule_repo: Arc<ScheduleRepository>, assessment_repo: Arc<AssessmentRepository>) -> Self {
        Self {
            schedule_repo,
            assessment_repo,
        }
    }

    /// 读取排程与评估并聚合
    pub async fn summary(&self) -> ApiResult<DashboardSummary> {
        let (schedules, assessments) = tokio::join!(self.schedule_repo.list(), self.assessment_repo.list());
        let summary = Self::aggregate(schedules?, &assessments?);
        tracing::debug!(
            schedules = summary.schedules.len(),
            assessments = summary.assessment_count,
            "总览数据已聚合"
        );
        Ok(summary)
    }

    /// 纯聚合
    ///
    /// 平均分相同时按机构目录顺序排列
    pub fn aggregate(mut schedules: Vec<ScheduleEntry>, assessments: &[AssessmentRecord]) -> DashboardSummary {
        let mut totals: BTreeMap<Facility, (u64, usize)> = BTreeMap::new();
        for record in assessments {
            let slot = totals.entry(record.hospital()).or_insert((0, 0));
            slot.0 += u64::from(record.total_score());
            slot.1 += 1;
        }

        let mut facility_averages: Vec<FacilityAverage> = totals
            .into_iter()
            .map(|(hospital, (sum, count))| FacilityAverage {
                hospital,
                average_score: round_half_up(sum, count),
                assessment_count: count,
            })
            .collect();
        facility_averages.sort_by(|a, b| b.average_score.cmp(&a.average_score));

        let grade_distribution = Grade::ALL
            .iter()
            .map(|grade| GradeCount {
                grade: *grade,
                count: assessments.iter().filter(|r| r.grade() == *grade).count(),
            })
            .collect();

        schedules.sort_by_key(|e| e.date());

        DashboardSummary {
            facility_averages,
            grade_distribution,
            schedules,
            assessment_count: assessments.len(),
        }
    }
}

/// sum / count 四舍五入（.5 进位）
fn round_half_up(sum: u64, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    let count = count as u64;
    ((sum * 2 + count) / (count * 2)) as u32
}
