// ==========================================
// 配置与应用装配集成测试
// ==========================================
// 测试目标: 配置持久化 → GatewayConfig → AppState 装配出的网关模式
// ==========================================

mod helpers;

use helpers::stub_server::StubServer;
use pt_visit_standards::api::ConfigApi;
use pt_visit_standards::app::AppState;
use pt_visit_standards::config::{ConfigManager, GatewayConfig};
use pt_visit_standards::domain::schedule::ScheduleDraft;
use pt_visit_standards::domain::types::Facility;
use std::sync::Arc;
use test_helpers::{create_test_db, date};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path);
    assert!(config_manager.is_ok(), "ConfigManager should be created successfully");
    assert_eq!(config_manager.unwrap().gateway_config().unwrap(), GatewayConfig::Local);
}

#[tokio::test]
async fn test_config_api_remote_url_validation() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ConfigApi::new(Arc::new(ConfigManager::new(&db_path).unwrap()));

    assert!(api.set_remote_url(Some("sheet.example.org")).is_err());
    api.set_remote_url(Some(" https://sheet.example.org/exec ")).unwrap();
    api.set_timeout_secs(5).unwrap();
    assert!(api.set_timeout_secs(0).is_err());

    match api.gateway_config().unwrap() {
        GatewayConfig::Remote { url, timeout } => {
            assert_eq!(url, "https://sheet.example.org/exec");
            assert_eq!(timeout.as_secs(), 5);
        }
        other => panic!("Expected Remote, got {:?}", other),
    }

    let keys: Vec<String> = api.list_configs().unwrap().into_iter().map(|c| c.key).collect();
    assert_eq!(keys, vec!["gateway.remote_url", "gateway.timeout_secs"]);

    api.set_remote_url(None).unwrap();
    assert_eq!(api.gateway_config().unwrap(), GatewayConfig::Local);
    assert!(api.set_locale("zh").is_err());
}

#[tokio::test]
async fn test_app_state_local_mode_end_to_end() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path.clone()).unwrap();
    assert_eq!(state.gateway_config, GatewayConfig::Local);

    let draft = ScheduleDraft::new(date("2025-06-02"))
        .with_host(Facility::KhonSan)
        .with_visitors(&[Facility::SapYai, Facility::BanThaen, Facility::HOME]);
    state.schedule_api.save(&draft).await.unwrap();
    drop(state);

    // 重新装配后数据仍在本地存储中
    let state = AppState::new(db_path).unwrap();
    let summary = state.dashboard_api.summary().await.unwrap();
    assert_eq!(summary.schedules.len(), 1);
    assert_eq!(summary.assessment_count, 0);
}

#[tokio::test]
async fn test_app_state_remote_mode_from_config() {
    let server = StubServer::fixed(200, "[]").await;
    let (_temp_file, db_path) = create_test_db().unwrap();

    ConfigApi::new(Arc::new(ConfigManager::new(&db_path).unwrap()))
        .set_remote_url(Some(&server.url))
        .unwrap();

    let state = AppState::new(db_path).unwrap();
    assert!(state.gateway_config.is_remote());

    let schedules = state.schedule_api.list_schedules().await.unwrap();
    assert!(schedules.is_empty());
    assert!(server.requests()[0].is_read("getSchedules"));
}
