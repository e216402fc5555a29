// ==========================================
// 持久化网关集成测试
// ==========================================
// 覆盖: 本地模式读写、远程读降级、远程写失败不落本地、写入确认
// ==========================================

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::stub_server::{unreachable_url, StubServer};
use pt_visit_standards::config::GatewayConfig;
use pt_visit_standards::domain::types::Facility;
use pt_visit_standards::repository::{
    build_gateway, AssessmentRepository, GatewayError, LocalStore, PersistenceGateway, RecordKind,
    RemoteStore, ScheduleRepository,
};
use serde_json::json;
use test_helpers::{date, local_gateway, schedule};

fn remote(url: &str, fallback: LocalStore) -> Arc<dyn PersistenceGateway> {
    Arc::new(RemoteStore::new(url, Duration::from_secs(2), fallback).unwrap())
}

fn schedule_json(on: &str) -> serde_json::Value {
    json!({
        "id": on,
        "date": on,
        "hostHospital": "รพ.คอนสาร",
        "hospitals": ["รพ.ซับใหญ่", "รพ.บ้านแท่น", "รพ.ชัยภูมิ", null, null]
    })
}

// ==========================================
// 本地模式
// ==========================================

#[tokio::test]
async fn test_local_mode_round_trip() {
    let (_tmp, local, _) = local_gateway();
    let gateway = build_gateway(&GatewayConfig::Local, local).unwrap();
    assert_eq!(gateway.mode_name(), "local");

    let repo = ScheduleRepository::new(gateway);
    let entry = schedule("2025-06-02", Facility::KhonSan, &[Facility::SapYai, Facility::BanThaen, Facility::HOME]);
    repo.upsert(&entry).await.unwrap();

    // 同日期再次保存为整体替换
    let replacement = schedule("2025-06-02", Facility::KhonSan, &[Facility::NoenSaNga, Facility::BanThaen, Facility::HOME]);
    repo.upsert(&replacement).await.unwrap();

    let all = repo.list().await.unwrap();
    assert_eq!(all, vec![replacement]);
}

#[tokio::test]
async fn test_local_mode_skips_unparsable_schedule_rows() {
    let (_tmp, local, gateway) = local_gateway();
    local.write_one(RecordKind::Schedule, schedule_json("2025-06-02")).unwrap();
    local
        .write_one(
            RecordKind::Schedule,
            json!({"date": "2025-06-09", "hostHospital": "unknown", "hospitals": []}),
        )
        .unwrap();

    let entries = ScheduleRepository::new(gateway).list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date(), date("2025-06-02"));
}

// ==========================================
// 远程模式 - 读取
// ==========================================

#[tokio::test]
async fn test_remote_read_success() {
    let server = StubServer::start(|req| {
        if req.is_read("getSchedules") {
            (200, json!([schedule_json("2025-06-02")]).to_string())
        } else {
            (200, "[]".to_string())
        }
    })
    .await;

    let (_tmp, local, _) = local_gateway();
    let repo = ScheduleRepository::new(remote(&server.url, local));
    let entries = repo.list().await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].host(), Facility::KhonSan);
    assert!(server.requests()[0].target.contains("action=getSchedules"));
}

#[tokio::test]
async fn test_remote_utc_timestamp_dates_map_to_local_day() {
    let server = StubServer::start(|req| {
        if req.is_read("getSchedules") {
            let mut row = schedule_json("2025-01-10");
            row["date"] = json!("2025-01-09T17:00:00.000Z");
            (200, json!([row]).to_string())
        } else {
            (200, "[]".to_string())
        }
    })
    .await;

    let (_tmp, local, _) = local_gateway();
    let repo = ScheduleRepository::new(remote(&server.url, local));

    assert!(repo.find_by_date(date("2025-01-09")).await.unwrap().is_none());
    let entry = repo.find_by_date(date("2025-01-10")).await.unwrap().unwrap();
    assert_eq!(entry.host(), Facility::KhonSan);
}

#[tokio::test]
async fn test_remote_schedule_read_failure_falls_back_to_local() {
    let (_tmp, local, _) = local_gateway();
    local.write_one(RecordKind::Schedule, schedule_json("2025-05-05")).unwrap();

    let repo = ScheduleRepository::new(remote(&unreachable_url(), local));
    let entries = repo.list().await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date(), date("2025-05-05"));
}

#[tokio::test]
async fn test_remote_schedule_http_error_falls_back_to_local() {
    let server = StubServer::fixed(500, "{\"error\":\"boom\"}").await;
    let (_tmp, local, _) = local_gateway();
    local.write_one(RecordKind::Schedule, schedule_json("2025-05-05")).unwrap();

    let entries = ScheduleRepository::new(remote(&server.url, local)).list().await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_remote_assessment_read_failure_returns_empty() {
    let (_tmp, local, _) = local_gateway();
    local
        .write_one(RecordKind::Assessment, json!({"id": "local-only", "hospital": "รพ.คอนสาร"}))
        .unwrap();

    let repo = AssessmentRepository::new(remote(&unreachable_url(), local));
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_non_array_body_reads_empty() {
    let server = StubServer::fixed(200, "{\"result\":\"error\"}").await;
    let (_tmp, local, _) = local_gateway();
    local.write_one(RecordKind::Schedule, schedule_json("2025-05-05")).unwrap();

    // 请求成功但格式异常: 按空处理，不回退
    let entries = ScheduleRepository::new(remote(&server.url, local)).list().await.unwrap();
    assert!(entries.is_empty());
}

// ==========================================
// 远程模式 - 写入
// ==========================================

#[tokio::test]
async fn test_remote_write_success_sends_action_and_payload() {
    let server = StubServer::fixed(200, "{\"success\":true}").await;
    let (_tmp, local, _) = local_gateway();
    let repo = ScheduleRepository::new(remote(&server.url, local.clone()));

    let entry = schedule("2025-06-02", Facility::KhonSan, &[Facility::SapYai, Facility::BanThaen, Facility::HOME]);
    repo.upsert(&entry).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is_write("saveSchedule"));
    assert!(requests[0].body.contains("2025-06-02"));
    assert!(requests[0].body.contains("hostHospital"));

    // 远程模式写入不落本地
    assert!(local.read_all(RecordKind::Schedule).unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_write_rejected() {
    let server = StubServer::fixed(200, "{\"success\":false,\"message\":\"sheet locked\"}").await;
    let (_tmp, local, _) = local_gateway();
    let gateway = remote(&server.url, local);

    let err = gateway
        .upsert(RecordKind::Assessment, json!({"id": "a-1"}))
        .await
        .unwrap_err();
    match err {
        GatewayError::RemoteRejected { action, body } => {
            assert_eq!(action, "saveAssessment");
            assert!(body.contains("sheet locked"));
        }
        other => panic!("Expected RemoteRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_write_failure_is_error_and_not_redirected() {
    let (_tmp, local, _) = local_gateway();
    let gateway = remote(&unreachable_url(), local.clone());

    let err = gateway
        .upsert(RecordKind::Schedule, schedule_json("2025-06-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport { .. }));
    assert!(local.read_all(RecordKind::Schedule).unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_write_not_retried() {
    let server = StubServer::fixed(503, "unavailable").await;
    let (_tmp, local, _) = local_gateway();
    let gateway = remote(&server.url, local);

    assert!(gateway
        .upsert(RecordKind::Schedule, schedule_json("2025-06-02"))
        .await
        .is_err());
    assert_eq!(server.requests().len(), 1);
}
