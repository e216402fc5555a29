// ==========================================
// 互访评估系统 - 评估标准定义 (Rubric)
// ==========================================
// 职责: 标准类别/条目定义、满分推导、等级阈值
// 红线: 百分比以声明满分为基数；推导满分与声明不一致时启动即告警
// ==========================================

use crate::domain::assessment::RawScoreSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// 单项评分上限
pub const MAX_RATING: u8 = 5;

/// 关键条目权重
pub const CRITICAL_WEIGHT: u32 = 3;

/// 内置标准中的关键条目
pub const STANDARD_CRITICAL_ITEMS: [&str; 8] =
    ["1.2", "2.2.1", "2.2.2", "2.5", "8.2", "8.3", "8.5", "8.9"];

// ==========================================
// RubricError - 标准定义错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RubricError {
    #[error("评估标准不包含任何条目")]
    Empty,

    #[error("条目ID重复: {0}")]
    DuplicateItemId(String),

    #[error("类别ID重复: {0}")]
    DuplicateCategoryId(u32),

    #[error("等级阈值无效: excellent={excellent}, very_good={very_good}, good={good}")]
    InvalidThresholds { excellent: u32, very_good: u32, good: u32 },

    #[error("满分不足以达到最高等级: max_score={max_score}, required={required}")]
    CeilingBelowTopGrade { max_score: u32, required: u32 },

    #[error("声明满分无效: full_score={full_score}, excellent={excellent}")]
    InvalidFullScore { full_score: u32, excellent: u32 },
}

pub type RubricResult<T> = Result<T, RubricError>;

// ==========================================
// GradeScale - 等级阈值
// ==========================================
/// 等级阈值（按总分，自高向低首个命中生效）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    /// 声明满分（百分比基数）
    pub full_score: u32,
    pub excellent: u32,
    pub very_good: u32,
    pub good: u32,
    /// 通过所需的最低百分比
    pub pass_percent: f64,
    /// 关键条目通过所需的最低原始评分（非加权）
    pub critical_min_rating: u8,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            full_score: 300,
            excellent: 240,
            very_good: 210,
            good: 180,
            pass_percent: 60.0,
            critical_min_rating: 3,
        }
    }
}

// ==========================================
// RubricItem / RubricCategory
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricItem {
    pub id: String,
    pub label: String,
    pub is_critical: bool,
}

impl RubricItem {
    pub fn new(id: impl Into<String>, is_critical: bool) -> Self {
        let id = id.into();
        Self {
            label: format!("ข้อ {}", id),
            id,
            is_critical,
        }
    }

    /// 条目权重（关键条目 ×3）
    pub fn weight(&self) -> u32 {
        if self.is_critical {
            CRITICAL_WEIGHT
        } else {
            1
        }
    }

    /// 条目可得最高分
    pub fn max_contribution(&self) -> u32 {
        MAX_RATING as u32 * self.weight()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCategory {
    pub id: u32,
    pub name: String,
    pub items: Vec<RubricItem>,
}

// ==========================================
// RubricDefinition - 评估标准
// ==========================================
/// 评估标准（启动时构造一次，之后只读）
#[derive(Debug, Clone, PartialEq)]
pub struct RubricDefinition {
    categories: Vec<RubricCategory>,
    scale: GradeScale,
    max_score: u32,
}

impl RubricDefinition {
    /// 使用默认等级阈值构造
    pub fn new(categories: Vec<RubricCategory>) -> RubricResult<Self> {
        Self::with_scale(categories, GradeScale::default())
    }

    /// 构造并校验标准定义
    ///
    /// # 校验
    /// - 至少一个条目
    /// - 类别ID、条目ID唯一
    /// - 阈值严格递减，声明满分 >= 最高等级阈值
    /// - 推导满分 >= 最高等级阈值
    /// - 推导满分 != 声明满分时记录 warn（百分比仍按声明满分计算）
    pub fn with_scale(categories: Vec<RubricCategory>, scale: GradeScale) -> RubricResult<Self> {
        let mut category_ids = HashSet::new();
        let mut item_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id) {
                return Err(RubricError::DuplicateCategoryId(category.id));
            }
            for item in &category.items {
                if !item_ids.insert(item.id.as_str()) {
                    return Err(RubricError::DuplicateItemId(item.id.clone()));
                }
            }
        }
        if item_ids.is_empty() {
            return Err(RubricError::Empty);
        }

        if !(scale.excellent > scale.very_good && scale.very_good > scale.good) {
            return Err(RubricError::InvalidThresholds {
                excellent: scale.excellent,
                very_good: scale.very_good,
                good: scale.good,
            });
        }

        if scale.full_score < scale.excellent {
            return Err(RubricError::InvalidFullScore {
                full_score: scale.full_score,
                excellent: scale.excellent,
            });
        }

        let max_score: u32 = categories
            .iter()
            .flat_map(|c| c.items.iter())
            .map(RubricItem::max_contribution)
            .sum();

        if max_score < scale.excellent {
            return Err(RubricError::CeilingBelowTopGrade {
                max_score,
                required: scale.excellent,
            });
        }

        if max_score != scale.full_score {
            tracing::warn!(
                derived = max_score,
                declared = scale.full_score,
                "评估标准推导满分与声明满分不一致"
            );
        }

        tracing::debug!(
            categories = categories.len(),
            items = item_ids.len(),
            max_score,
            "评估标准已加载"
        );

        Ok(Self {
            categories,
            scale,
            max_score,
        })
    }

    /// 内置标准: 9 个类别 / 51 个条目 / 8 个关键条目
    pub fn standard() -> RubricResult<Self> {
        let table: [(u32, &str, &[&str]); 9] = [
            (1, "มาตรฐานที่ 1: การจัดองค์กรและการบริหารงานกายภาพบำบัด", &["1.1", "1.2", "1.3", "1.4", "1.5"]),
            (2, "มาตรฐานที่ 2: การบริหารและพัฒนาทรัพยากรบุคคล", &["2.1", "2.2", "2.2.1", "2.2.2", "2.2.3", "2.3.1", "2.3.2", "2.3.3", "2.4", "2.5"]),
            (3, "มาตรฐานที่ 3: การบริหารสิ่งแวดล้อมและความปลอดภัย", &["3.1.1", "3.1.2", "3.1.3", "3.2", "3.3.1", "3.3.2", "3.4", "3.5.1", "3.5.2"]),
            (4, "มาตรฐานที่ 4: การบริหารความเสี่ยง", &["4.1", "4.2", "4.3", "4.4"]),
            (5, "มาตรฐานที่ 5: เครื่องมือทางกายภาพบำบัด อุปกรณ์ และสิ่งอำนวยความสะดวก", &["5.1", "5.2", "5.3", "5.4", "5.5"]),
            (6, "มาตรฐานที่ 6: ระบบข้อมูลสารสนเทศทางกายภาพบำบัด", &["6.1", "6.2"]),
            (7, "มาตรฐานที่ 7: การบริการทางกายภาพบำบัด", &["7.1"]),
            (8, "มาตรฐานที่ 8: กระบวนการทางกายภาพบำบัด", &["8.1.1", "8.1.2", "8.2", "8.3", "8.4.1", "8.4.2", "8.4.3", "8.5", "8.6", "8.7", "8.8", "8.9"]),
            (9, "มาตรฐานที่ 9: ผลลัพธ์การดำเนินงานของงานกายภาพบำบัด", &["9.1", "9.2", "9.3"]),
        ];

        let categories = table
            .iter()
            .map(|(id, name, items)| RubricCategory {
                id: *id,
                name: name.to_string(),
                items: items
                    .iter()
                    .map(|item_id| RubricItem::new(*item_id, STANDARD_CRITICAL_ITEMS.contains(item_id)))
                    .collect(),
            })
            .collect();

        Self::new(categories)
    }

    pub fn categories(&self) -> &[RubricCategory] {
        &self.categories
    }

    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    /// 推导满分（Σ 5 × 权重）
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    /// 声明满分（百分比基数）
    pub fn full_score(&self) -> u32 {
        self.scale.full_score
    }

    /// 推导满分与声明满分是否一致
    pub fn ceiling_matches(&self) -> bool {
        self.max_score == self.scale.full_score
    }

    /// 按顺序遍历全部条目
    pub fn items(&self) -> impl Iterator<Item = &RubricItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    pub fn critical_items(&self) -> impl Iterator<Item = &RubricItem> {
        self.items().filter(|i| i.is_critical)
    }

    pub fn find_item(&self, item_id: &str) -> Option<&RubricItem> {
        self.items().find(|i| i.id == item_id)
    }

    pub fn has_category(&self, category_id: u32) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }

    /// 未评分条目（按标准顺序）
    pub fn unrated_items<'a>(&'a self, scores: &RawScoreSet) -> Vec<&'a str> {
        self.items()
            .filter(|i| scores.rating(&i.id) == 0)
            .map(|i| i.id.as_str())
            .collect()
    }
}
