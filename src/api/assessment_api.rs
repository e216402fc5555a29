// ==========================================
// 互访评估系统 - 评估 API
// ==========================================
// 职责: 实时评分预览、评估提交、评估记录查询
// 红线: 总分/等级/通过只来自评分引擎；记录提交后不可修改
// ==========================================

use std::sync::Arc;

use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::assessment::{AssessmentDraft, AssessmentRecord, RawScoreSet};
use crate::domain::rubric::RubricDefinition;
use crate::engine::scoring::{ScoreResult, ScoringEngine};
use crate::i18n::t_with_args;
use crate::repository::{AssessmentRepository, ScheduleRepository};

/// 评估API
pub struct AssessmentApi {
    rubric: Arc<RubricDefinition>,
    assessment_repo: Arc<AssessmentRepository>,
    schedule_repo: Arc<ScheduleRepository>,
}

impl AssessmentApi {
    pub fn new(
        rubric: Arc<RubricDefinition>,
        assessment_repo: Arc<AssessmentRepository>,
        schedule_repo: Arc<ScheduleRepository>,
    ) -> Self {
        Self {
            rubric,
            assessment_repo,
            schedule_repo,
        }
    }

    pub fn rubric(&self) -> &RubricDefinition {
        &self.rubric
    }

    /// 实时评分（每次评分变化后调用）
    pub fn preview(&self, scores: &RawScoreSet) -> ScoreResult {
        ScoringEngine::score(&self.rubric, scores)
    }

    /// 尚未评分的条目（按标准顺序）
    pub fn unrated_items(&self, scores: &RawScoreSet) -> Vec<String> {
        self.rubric
            .unrated_items(scores)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// 提交评估
    ///
    /// # 参数
    /// - draft: 评估草稿
    /// - confirm_incomplete: 用户已确认提交未填完的评估
    ///
    /// # 返回
    /// - Ok(AssessmentRecord): 已保存的记录（UUID、访问小组快照）
    /// - Err(ApiError::IncompleteAssessment): 有未评分条目且未确认，未写入
    /// - Err(ApiError::InvalidInput): 存在标准外的条目或类别
    pub async fn submit(
        &self,
        draft: &AssessmentDraft,
        confirm_incomplete: bool,
    ) -> ApiResult<AssessmentRecord> {
        self.check_known_ids(draft)?;

        let unrated = self.unrated_items(&draft.scores);
        if !unrated.is_empty() {
            if !confirm_incomplete {
                let count = unrated.len().to_string();
                tracing::info!(
                    hospital = %draft.hospital.code(),
                    missing = unrated.len(),
                    "{}",
                    t_with_args("assessment.incomplete", &[("count", count.as_str())])
                );
                return Err(ApiError::IncompleteAssessment { unrated });
            }
            tracing::warn!(hospital = %draft.hospital.code(), missing = unrated.len(), "提交未填完的评估（已确认）");
        }

        let result = ScoringEngine::score(&self.rubric, &draft.scores);

        // 访问小组快照: 主办机构与日期均匹配的排程
        let visitors = self
            .schedule_repo
            .find_by_date(draft.date)
            .await?
            .filter(|entry| entry.host() == draft.hospital)
            .map(|entry| entry.visitors().collect())
            .unwrap_or_default();

        let record = AssessmentRecord::new(
            Uuid::new_v4().to_string(),
            draft.hospital,
            draft.date,
            draft.scores.clone(),
            draft.comments.clone(),
            result.total_score,
            result.grade,
            result.passed,
            visitors,
        );

        self.assessment_repo.insert(&record).await?;
        tracing::info!(
            id = %record.id(),
            hospital = %record.hospital().code(),
            total_score = record.total_score(),
            grade = %record.grade(),
            passed = record.passed(),
            "评估已提交"
        );
        Ok(record)
    }

    /// 全部评估记录
    pub async fn list_assessments(&self) -> ApiResult<Vec<AssessmentRecord>> {
        Ok(self.assessment_repo.list().await?)
    }

    fn check_known_ids(&self, draft: &AssessmentDraft) -> ApiResult<()> {
        if let Some((item_id, _)) = draft
            .scores
            .iter()
            .find(|(item_id, _)| self.rubric.find_item(item_id).is_none())
        {
            return Err(ApiError::InvalidInput(format!("未知评估条目: {}", item_id)));
        }

        if let Some(category_id) = draft
            .comments
            .keys()
            .find(|id| !self.rubric.has_category(**id))
        {
            return Err(ApiError::InvalidInput(format!("未知评估类别: {}", category_id)));
        }

        Ok(())
    }
}
