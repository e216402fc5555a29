// ==========================================
// 互访评估系统 - 配置层
// ==========================================
// 职责: 系统配置管理（网关模式、语言）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod gateway_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_LOCALE};
pub use gateway_config::{GatewayConfig, DEFAULT_TIMEOUT_SECS};
