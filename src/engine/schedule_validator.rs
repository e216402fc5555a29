// ==========================================
// 互访评估系统 - 排程约束校验器
// ==========================================
// 职责: 校验人工选定的访问小组是否满足公平轮换规则
// 红线: 只校验不求解；无状态、无副作用、无 I/O 操作
// ==========================================
// 规则（相互独立，全部执行，不短路）:
// 1. 主办机构不得出现在访问小组中
// 2. 同一天内访问机构不得重复
// 3. 轮换配额: [date - 3个自然月, date) 内已出访 >= 3 次的机构
//    不得再次入选；主办机构(HOME)永久豁免
// ==========================================

use crate::domain::schedule::{ScheduleDraft, ScheduleEntry};
use crate::domain::types::Facility;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 违规类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    HostInTeam,
    DuplicateVisitor,
    VisitQuotaExceeded,
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationCode::HostInTeam => write!(f, "HOST_IN_TEAM"),
            ViolationCode::DuplicateVisitor => write!(f, "DUPLICATE_VISITOR"),
            ViolationCode::VisitQuotaExceeded => write!(f, "VISIT_QUOTA_EXCEEDED"),
        }
    }
}

/// 单条违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleViolation {
    pub code: ViolationCode,
    pub facility: Facility,
    /// 窗口内已出访次数（仅配额违规）
    pub visit_count: Option<usize>,
}

// ==========================================
// QuotaRule - 轮换配额参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRule {
    /// 回溯窗口（自然月）
    pub window_months: u32,
    /// 窗口内出访次数达到该值即违规
    pub max_visits: usize,
}

impl Default for QuotaRule {
    fn default() -> Self {
        Self {
            window_months: 3,
            max_visits: 3,
        }
    }
}

impl QuotaRule {
    /// 回溯窗口起点（含）；月末日期按目标月最后一天截断
    pub fn window_start(&self, date: NaiveDate) -> NaiveDate {
        date.checked_sub_months(Months::new(self.window_months))
            .unwrap_or(NaiveDate::MIN)
    }

    /// 日期是否落在 [start, date) 内
    pub fn in_window(&self, candidate_date: NaiveDate, entry_date: NaiveDate) -> bool {
        entry_date >= self.window_start(candidate_date) && entry_date < candidate_date
    }
}

// ==========================================
// ScheduleValidator
// ==========================================
pub struct ScheduleValidator;

impl ScheduleValidator {
    /// 按默认配额校验
    pub fn validate(candidate: &ScheduleDraft, history: &[ScheduleEntry]) -> Vec<ScheduleViolation> {
        Self::validate_with(candidate, history, &QuotaRule::default())
    }

    /// 校验候选排程
    ///
    /// # 参数
    /// - candidate: 候选排程（主办机构可为空，此时跳过规则1）
    /// - history: 历史排程；与候选同日期的条目自动跳过
    /// - rule: 轮换配额参数
    ///
    /// # 返回
    /// - 违规列表（空表示通过）
    pub fn validate_with(
        candidate: &ScheduleDraft,
        history: &[ScheduleEntry],
        rule: &QuotaRule,
    ) -> Vec<ScheduleViolation> {
        let mut violations = Vec::new();
        violations.extend(Self::check_host_in_team(candidate));
        violations.extend(Self::check_duplicates(candidate));
        violations.extend(Self::check_rotation_quota(candidate, history, rule));

        if !violations.is_empty() {
            tracing::debug!(
                date = %candidate.date,
                count = violations.len(),
                "排程校验发现违规"
            );
        }
        violations
    }

    /// 规则1: 主办机构不得同时出访
    fn check_host_in_team(candidate: &ScheduleDraft) -> Option<ScheduleViolation> {
        let host = candidate.host?;
        candidate
            .visitors()
            .any(|f| f == host)
            .then_some(ScheduleViolation {
                code: ViolationCode::HostInTeam,
                facility: host,
                visit_count: None,
            })
    }

    /// 规则2: 同日重复（每个重复机构报告一次）
    fn check_duplicates(candidate: &ScheduleDraft) -> Vec<ScheduleViolation> {
        let mut seen: Vec<Facility> = Vec::new();
        let mut reported: Vec<Facility> = Vec::new();
        for facility in candidate.visitors() {
            if seen.contains(&facility) {
                if !reported.contains(&facility) {
                    reported.push(facility);
                }
            } else {
                seen.push(facility);
            }
        }

        reported
            .into_iter()
            .map(|facility| ScheduleViolation {
                code: ViolationCode::DuplicateVisitor,
                facility,
                visit_count: None,
            })
            .collect()
    }

    /// 规则3: 轮换配额
    fn check_rotation_quota(
        candidate: &ScheduleDraft,
        history: &[ScheduleEntry],
        rule: &QuotaRule,
    ) -> Vec<ScheduleViolation> {
        let window: Vec<&ScheduleEntry> = history
            .iter()
            .filter(|e| e.date() != candidate.date)
            .filter(|e| rule.in_window(candidate.date, e.date()))
            .collect();

        let mut checked: Vec<Facility> = Vec::new();
        let mut violations = Vec::new();
        for facility in candidate.visitors() {
            if facility.is_home() || checked.contains(&facility) {
                continue;
            }
            checked.push(facility);

            let visit_count = window.iter().filter(|e| e.includes_visitor(facility)).count();
            if visit_count >= rule.max_visits {
                violations.push(ScheduleViolation {
                    code: ViolationCode::VisitQuotaExceeded,
                    facility,
                    visit_count: Some(visit_count),
                });
            }
        }
        violations
    }
}
