// ==========================================
// 互访评估系统 - 应用状态
// ==========================================
// 职责: 装配共享连接、配置、网关、仓储与 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AssessmentApi, ConfigApi, DashboardApi, ScheduleApi};
use crate::config::config_manager::ConfigManager;
use crate::config::GatewayConfig;
use crate::db::open_sqlite_connection;
use crate::domain::rubric::RubricDefinition;
use crate::i18n;
use crate::repository::{build_gateway, AssessmentRepository, LocalStore, ScheduleRepository};

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时解析出的网关连接模式
    pub gateway_config: GatewayConfig,

    /// 排程API
    pub schedule_api: Arc<ScheduleApi>,

    /// 评估API
    pub assessment_api: Arc<AssessmentApi>,

    /// 总览API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（配置与本地回退存储共用）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let gateway_config = config_manager
            .gateway_config()
            .map_err(|e| format!("无法读取网关配置: {}", e))?;
        let locale = config_manager
            .locale()
            .map_err(|e| format!("无法读取语言配置: {}", e))?;
        if !i18n::set_locale(&locale) {
            tracing::warn!(locale = %locale, "不支持的语言配置，沿用默认语言");
        }

        // ==========================================
        // 网关与仓储
        // ==========================================
        let local_store = LocalStore::from_connection(conn);
        let gateway = build_gateway(&gateway_config, local_store)
            .map_err(|e| format!("无法创建持久化网关: {}", e))?;

        let schedule_repo = Arc::new(ScheduleRepository::new(gateway.clone()));
        let assessment_repo = Arc::new(AssessmentRepository::new(gateway));

        // ==========================================
        // API
        // ==========================================
        let rubric = Arc::new(
            RubricDefinition::standard().map_err(|e| format!("评估标准无效: {}", e))?,
        );

        let schedule_api = Arc::new(ScheduleApi::new(schedule_repo.clone()));
        let assessment_api = Arc::new(AssessmentApi::new(
            rubric,
            assessment_repo.clone(),
            schedule_repo.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(schedule_repo, assessment_repo));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!(
            mode = if gateway_config.is_remote() { "remote" } else { "local" },
            locale = %locale,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            gateway_config,
            schedule_api,
            assessment_api,
            dashboard_api,
            config_api,
        })
    }
}

/// 默认数据库路径
///
/// # 规则
/// - 环境变量 PT_VISIT_STANDARDS_DB_PATH 优先
/// - 其次为用户数据目录下的 pt-visit-standards/pt_visit_standards.db
/// - 取不到数据目录时回落到当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PT_VISIT_STANDARDS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pt_visit_standards.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("pt-visit-standards");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("无法创建数据目录 {}: {}，使用当前目录", dir.display(), e);
        } else {
            path = dir.join("pt_visit_standards.db");
        }
    }

    path.to_string_lossy().to_string()
}
