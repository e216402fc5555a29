// ==========================================
// 互访评估系统 - 评估记录领域模型
// ==========================================
// 职责: 原始评分集、评语集、评估记录
// 红线: 评估记录创建后不可修改
// ==========================================

use crate::domain::rubric::MAX_RATING;
use crate::domain::types::{Facility, Grade};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ==========================================
// ScoreError - 评分输入错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("评分超出范围 (item={item_id}): {rating}, 允许范围 1..={max}")]
    RatingOutOfRange { item_id: String, rating: u8, max: u8 },
}

// ==========================================
// RawScoreSet - 原始评分集
// ==========================================
/// 条目ID → 评分(1..=5)，缺失视为 0（未评分）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u8>", into = "BTreeMap<String, u8>")]
pub struct RawScoreSet(BTreeMap<String, u8>);

impl RawScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 录入评分，超出 1..=5 的值被拒绝
    pub fn insert(&mut self, item_id: &str, rating: u8) -> Result<(), ScoreError> {
        if rating == 0 || rating > MAX_RATING {
            return Err(ScoreError::RatingOutOfRange {
                item_id: item_id.to_string(),
                rating,
                max: MAX_RATING,
            });
        }
        self.0.insert(item_id.to_string(), rating);
        Ok(())
    }

    /// 撤销评分
    pub fn clear(&mut self, item_id: &str) -> Option<u8> {
        self.0.remove(item_id)
    }

    /// 读取评分，未评分返回 0
    pub fn rating(&self, item_id: &str) -> u8 {
        self.0.get(item_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl TryFrom<BTreeMap<String, u8>> for RawScoreSet {
    type Error = ScoreError;

    fn try_from(map: BTreeMap<String, u8>) -> Result<Self, Self::Error> {
        let mut set = RawScoreSet::new();
        for (item_id, rating) in map {
            set.insert(&item_id, rating)?;
        }
        Ok(set)
    }
}

impl From<RawScoreSet> for BTreeMap<String, u8> {
    fn from(set: RawScoreSet) -> Self {
        set.0
    }
}

// ==========================================
// 评语
// ==========================================
/// 单个类别的评语（ข้อชื่นชม / ข้อเสนอแนะ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardComment {
    #[serde(default)]
    pub commendation: String,
    #[serde(default)]
    pub suggestion: String,
}

impl StandardComment {
    pub fn is_blank(&self) -> bool {
        self.commendation.trim().is_empty() && self.suggestion.trim().is_empty()
    }
}

/// 类别ID → 评语，不参与计分
pub type CommentSet = BTreeMap<u32, StandardComment>;

// ==========================================
// AssessmentRecord - 评估记录
// ==========================================
/// 评估记录（保存时创建，之后只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    id: String,
    hospital: Facility,
    #[serde(with = "crate::domain::wire_date")]
    date: NaiveDate,
    scores: RawScoreSet,
    #[serde(default)]
    comments: CommentSet,
    total_score: u32,
    grade: Grade,
    passed: bool,
    #[serde(default)]
    visitors: Vec<Facility>,
}

impl AssessmentRecord {
    /// 创建评估记录
    ///
    /// 说明: total_score / grade / passed 来自评分引擎输出，调用方不得自行拼装
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        hospital: Facility,
        date: NaiveDate,
        scores: RawScoreSet,
        comments: CommentSet,
        total_score: u32,
        grade: Grade,
        passed: bool,
        visitors: Vec<Facility>,
    ) -> Self {
        Self {
            id,
            hospital,
            date,
            scores,
            comments,
            total_score,
            grade,
            passed,
            visitors,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hospital(&self) -> Facility {
        self.hospital
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn scores(&self) -> &RawScoreSet {
        &self.scores
    }

    pub fn comments(&self) -> &CommentSet {
        &self.comments
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn visitors(&self) -> &[Facility] {
        &self.visitors
    }
}

// ==========================================
// AssessmentDraft - 评估草稿
// ==========================================
/// 填写中的评估（提交时由评分引擎补全总分/等级）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDraft {
    pub hospital: Facility,
    pub date: NaiveDate,
    pub scores: RawScoreSet,
    pub comments: CommentSet,
}

impl AssessmentDraft {
    pub fn new(hospital: Facility, date: NaiveDate) -> Self {
        Self {
            hospital,
            date,
            scores: RawScoreSet::new(),
            comments: CommentSet::new(),
        }
    }

    /// 填写类别评语（空白评语不保存）
    pub fn set_comment(&mut self, category_id: u32, comment: StandardComment) {
        if comment.is_blank() {
            self.comments.remove(&category_id);
        } else {
            self.comments.insert(category_id, comment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_score_set_rejects_out_of_range() {
        let mut set = RawScoreSet::new();
        assert!(set.insert("1.1", 5).is_ok());
        assert!(set.insert("1.2", 0).is_err());
        assert!(set.insert("1.3", 6).is_err());
        assert_eq!(set.rating("1.1"), 5);
        assert_eq!(set.rating("1.2"), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_raw_score_set_deserialize_validates() {
        let ok: RawScoreSet = serde_json::from_str(r#"{"1.1": 3, "8.9": 5}"#).unwrap();
        assert_eq!(ok.rating("8.9"), 5);
        assert!(serde_json::from_str::<RawScoreSet>(r#"{"1.1": 9}"#).is_err());
    }

    #[test]
    fn test_assessment_record_wire_shape() {
        let mut scores = RawScoreSet::new();
        scores.insert("1.1", 4).unwrap();
        let mut comments = CommentSet::new();
        comments.insert(
            1,
            StandardComment {
                commendation: "ดี".to_string(),
                suggestion: String::new(),
            },
        );
        let record = AssessmentRecord::new(
            "a-1".to_string(),
            Facility::KhonSan,
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            scores,
            comments,
            4,
            Grade::Fail,
            false,
            vec![Facility::SapYai, Facility::Chaiyaphum],
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "a-1");
        assert_eq!(value["hospital"], "รพ.คอนสาร");
        assert_eq!(value["date"], "2025-03-14");
        assert_eq!(value["scores"]["1.1"], 4);
        assert_eq!(value["comments"]["1"]["commendation"], "ดี");
        assert_eq!(value["totalScore"], 4);
        assert_eq!(value["grade"], "ไม่ผ่าน");
        assert_eq!(value["passed"], false);
        assert_eq!(value["visitors"][1], "รพ.ชัยภูมิ");
    }

    #[test]
    fn test_assessment_record_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": "1700000000000",
            "hospital": "รพ.จตุรัส",
            "date": "2024-11-02T00:00:00.000Z",
            "scores": {},
            "totalScore": 0,
            "grade": "ไม่ผ่าน",
            "passed": false
        }"#;
        let record: AssessmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.hospital(), Facility::Chatturat);
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 11, 2).unwrap());
        assert!(record.comments().is_empty());
        assert!(record.visitors().is_empty());
    }
}
