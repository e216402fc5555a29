// ==========================================
// 互访评估系统 - 应用层
// ==========================================
// 职责: 应用状态装配
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
