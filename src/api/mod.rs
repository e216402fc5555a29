// ==========================================
// 互访评估系统 - API 层
// ==========================================
// 职责: 编排引擎与网关，提供排程/评估/总览/配置业务接口
// ==========================================

pub mod assessment_api;
pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod schedule_api;
pub mod validator;

// 重导出核心类型
pub use assessment_api::AssessmentApi;
pub use config_api::{ConfigApi, ConfigItem};
pub use dashboard_api::{DashboardApi, DashboardSummary, FacilityAverage, GradeCount};
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use schedule_api::{MonthGroup, ScheduleApi};
pub use validator::{ScheduleSaveValidator, ValidationMode};
