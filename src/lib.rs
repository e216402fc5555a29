// ==========================================
// 互访评估系统 - 核心库
// ==========================================
// มาตรฐานบริการกายภาพบำบัด: 物理治疗服务标准互访
// 范围: 评分引擎 / 排程约束校验 / 远程+本地双模式持久化
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "th");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 机构目录、评估标准、排程与评估记录
pub mod domain;

// 引擎层 - 纯函数规则
pub mod engine;

// 持久化网关层 - 远程存储 / 本地回退
pub mod repository;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AssessmentDraft, AssessmentRecord, Facility, Grade, RawScoreSet, RubricDefinition, ScheduleDraft,
    ScheduleEntry,
};

pub use engine::{ScheduleValidator, ScoringEngine};

pub use api::{ApiError, ApiResult, AssessmentApi, DashboardApi, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "มาตรฐานบริการกายภาพบำบัด";
