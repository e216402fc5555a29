// ==========================================
// 互访评估系统 - 评分引擎
// ==========================================
// 职责: 原始评分 → 加权总分 / 百分比 / 关键条目门槛 / 等级
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================
// 规则:
// - 条目得分 = 评分（未评分为 0），关键条目 ×3
// - 百分比 = 总分 / 声明满分(300) × 100
// - 关键条目通过 = 原始评分 >= 3（非加权）
// - 等级按总分自高向低首个命中: 240 / 210 / 180
// - 通过 = 百分比 >= 60 且全部关键条目通过；未通过强制 Fail
// ==========================================

use crate::domain::assessment::RawScoreSet;
use crate::domain::rubric::{GradeScale, RubricDefinition};
use crate::domain::types::Grade;
use serde::{Deserialize, Serialize};

/// 关键条目检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalCheck {
    pub id: String,
    pub pass: bool,
}

/// 评分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total_score: u32,
    pub max_score: u32,
    pub percent: f64,
    pub grade: Grade,
    pub passed: bool,
    pub critical_breakdown: Vec<CriticalCheck>,
}

impl ScoreResult {
    /// 未通过的关键条目
    pub fn failed_critical_items(&self) -> impl Iterator<Item = &str> {
        self.critical_breakdown
            .iter()
            .filter(|c| !c.pass)
            .map(|c| c.id.as_str())
    }
}

// ==========================================
// ScoringEngine - 纯函数评分器
// ==========================================
pub struct ScoringEngine;

impl ScoringEngine {
    /// 计算评估结果
    ///
    /// # 参数
    /// - rubric: 评估标准
    /// - scores: 原始评分（缺失视为 0，不报错）
    pub fn score(rubric: &RubricDefinition, scores: &RawScoreSet) -> ScoreResult {
        let scale = rubric.scale();
        let mut total_score: u32 = 0;
        let mut critical_breakdown = Vec::new();

        for item in rubric.items() {
            let raw = scores.rating(&item.id);
            total_score += raw as u32 * item.weight();

            if item.is_critical {
                critical_breakdown.push(CriticalCheck {
                    id: item.id.clone(),
                    pass: raw >= scale.critical_min_rating,
                });
            }
        }

        let max_score = rubric.full_score();
        let percent = Self::percent(total_score, max_score);
        let critical_passed = critical_breakdown.iter().all(|c| c.pass);
        let passed = percent >= scale.pass_percent && critical_passed;

        let grade = if passed {
            Self::grade_for_total(scale, total_score)
        } else {
            Grade::Fail
        };

        tracing::trace!(total_score, max_score, percent, passed, grade = %grade, "评分完成");

        ScoreResult {
            total_score,
            max_score,
            percent,
            grade,
            passed,
            critical_breakdown,
        }
    }

    /// 按总分判定等级（不含通过门槛）
    pub fn grade_for_total(scale: &GradeScale, total_score: u32) -> Grade {
        if total_score >= scale.excellent {
            Grade::Excellent
        } else if total_score >= scale.very_good {
            Grade::VeryGood
        } else if total_score >= scale.good {
            Grade::Good
        } else {
            Grade::Fail
        }
    }

    /// 百分比（先乘后除，整数结果无舍入误差）
    pub fn percent(total_score: u32, max_score: u32) -> f64 {
        if max_score == 0 {
            return 0.0;
        }
        total_score as f64 * 100.0 / max_score as f64
    }
}
