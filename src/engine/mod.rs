// ==========================================
// 互访评估系统 - 引擎层
// ==========================================
// 职责: 评分与排程校验的纯规则实现
// 红线: Engine 不做 I/O, 所有违规必须给出类型与机构
// ==========================================

pub mod schedule_validator;
pub mod scoring;

// 重导出核心引擎
pub use schedule_validator::{QuotaRule, ScheduleValidator, ScheduleViolation, ViolationCode};
pub use scoring::{CriticalCheck, ScoreResult, ScoringEngine};
