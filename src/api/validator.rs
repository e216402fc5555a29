// ==========================================
// 互访评估系统 - 排程保存校验器
// ==========================================
// 职责: 在约束校验器之上叠加保存前置条件
// - 必须选择主办机构
// - 访问小组非空槽位数 3..=5
// - 约束违规（主办出访/同日重复/轮换配额）在保存时一律阻断
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::schedule::{ScheduleDraft, ScheduleEntry, TEAM_SLOTS};
use crate::engine::schedule_validator::{QuotaRule, ScheduleValidator, ScheduleViolation, ViolationCode};
use crate::i18n::t_with_args;

/// 访问小组最少机构数
pub const MIN_TEAM_SIZE: usize = 3;

/// 访问小组最多机构数
pub const MAX_TEAM_SIZE: usize = TEAM_SLOTS;

// ==========================================
// ValidationMode - 校验模式
// ==========================================

/// 校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMode {
    /// 严格模式：任何违规都返回错误（保存）
    Strict,
    /// 提示模式：仅返回约束违规列表（编辑中实时提示）
    Advisory,
}

// ==========================================
// ScheduleSaveValidator
// ==========================================
pub struct ScheduleSaveValidator {
    quota_rule: QuotaRule,
}

impl Default for ScheduleSaveValidator {
    fn default() -> Self {
        Self::new(QuotaRule::default())
    }
}

impl ScheduleSaveValidator {
    pub fn new(quota_rule: QuotaRule) -> Self {
        Self { quota_rule }
    }

    /// 校验草稿
    ///
    /// # 参数
    /// - draft: 排程草稿
    /// - history: 历史排程（调用方应已剔除同日期条目）
    /// - mode: 校验模式
    ///
    /// # 返回
    /// - Ok(Vec<ValidationViolation>): Advisory 模式下的违规提示；Strict 模式下恒为空
    /// - Err(ApiError::ValidationFailed): Strict 模式下存在任何违规
    pub fn check(
        &self,
        draft: &ScheduleDraft,
        history: &[ScheduleEntry],
        mode: ValidationMode,
    ) -> ApiResult<Vec<ValidationViolation>> {
        let rule_violations: Vec<ValidationViolation> =
            ScheduleValidator::validate_with(draft, history, &self.quota_rule)
                .iter()
                .map(describe_violation)
                .collect();

        match mode {
            ValidationMode::Advisory => Ok(rule_violations),
            ValidationMode::Strict => {
                let mut violations = Vec::new();

                if draft.host.is_none() {
                    violations.push(ValidationViolation {
                        violation_type: "HOST_MISSING".to_string(),
                        facility: None,
                        reason: t_with_args("schedule.missing_host", &[]),
                    });
                }

                violations.extend(rule_violations);

                let team_size = draft.team_size();
                if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&team_size) {
                    let (min, max, count) = (
                        MIN_TEAM_SIZE.to_string(),
                        MAX_TEAM_SIZE.to_string(),
                        team_size.to_string(),
                    );
                    violations.push(ValidationViolation {
                        violation_type: "TEAM_SIZE".to_string(),
                        facility: None,
                        reason: t_with_args(
                            "schedule.team_size",
                            &[("min", min.as_str()), ("max", max.as_str()), ("count", count.as_str())],
                        ),
                    });
                }

                if violations.is_empty() {
                    Ok(Vec::new())
                } else {
                    tracing::warn!(date = %draft.date, count = violations.len(), "排程保存被拒绝");
                    let count = violations.len().to_string();
                    Err(ApiError::ValidationFailed {
                        reason: t_with_args("schedule.save_blocked", &[("count", count.as_str())]),
                        violations,
                    })
                }
            }
        }
    }
}

/// 约束违规 → 用户可读违规
pub fn describe_violation(violation: &ScheduleViolation) -> ValidationViolation {
    let facility = violation.facility.display_name();
    let reason = match violation.code {
        ViolationCode::HostInTeam => t_with_args("schedule.host_in_team", &[("facility", facility)]),
        ViolationCode::DuplicateVisitor => {
            t_with_args("schedule.duplicate_visitor", &[("facility", facility)])
        }
        ViolationCode::VisitQuotaExceeded => {
            let count = violation.visit_count.unwrap_or_default().to_string();
            t_with_args("schedule.quota_exceeded", &[("facility", facility), ("count", count.as_str())])
        }
    };

    ValidationViolation {
        violation_type: violation.code.to_string(),
        facility: Some(violation.facility),
        reason,
    }
}
