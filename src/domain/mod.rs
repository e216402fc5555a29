// ==========================================
// 互访评估系统 - 领域模型层
// ==========================================
// 职责: 定义机构目录、评估标准、排程与评估记录
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assessment;
pub mod rubric;
pub mod schedule;
pub mod types;
pub mod wire_date;

// 重导出核心类型
pub use assessment::{AssessmentDraft, AssessmentRecord, CommentSet, RawScoreSet, ScoreError, StandardComment};
pub use rubric::{GradeScale, RubricCategory, RubricDefinition, RubricError, RubricItem};
pub use schedule::{ScheduleDraft, ScheduleEntry, ScheduleError, TeamSlots, TEAM_SLOTS};
pub use types::{Facility, Grade, UnknownFacility};
