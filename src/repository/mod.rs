// ==========================================
// 互访评估系统 - 持久化网关层
// ==========================================
// 职责: 远程存储 / 本地回退存储的统一读写接口
// 约束: 连接模式由 GatewayConfig 显式传入
// ==========================================

pub mod assessment_repo;
pub mod error;
pub mod gateway;
pub mod local_store;
pub mod remote_store;
pub mod schedule_repo;

// 重导出核心仓储
pub use assessment_repo::AssessmentRepository;
pub use error::{GatewayError, GatewayResult};
pub use gateway::{PersistenceGateway, RecordKind};
pub use local_store::LocalStore;
pub use remote_store::RemoteStore;
pub use schedule_repo::ScheduleRepository;

use crate::config::GatewayConfig;
use std::sync::Arc;

/// 按连接模式创建网关
///
/// # 参数
/// - config: 连接模式
/// - local: 本地存储（Local 模式直接使用；Remote 模式作为排程读回退）
pub fn build_gateway(config: &GatewayConfig, local: LocalStore) -> GatewayResult<Arc<dyn PersistenceGateway>> {
    match config {
        GatewayConfig::Local => {
            tracing::info!("持久化网关: 本地模式");
            Ok(Arc::new(local))
        }
        GatewayConfig::Remote { url, timeout } => {
            tracing::info!(url = %url, timeout_secs = timeout.as_secs(), "持久化网关: 远程模式");
            Ok(Arc::new(RemoteStore::new(url, *timeout, local)?))
        }
    }
}
