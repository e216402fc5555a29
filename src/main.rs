// ==========================================
// 互访评估系统 - 命令行入口
// ==========================================
// 启动: 初始化日志 → 装配 AppState → 输出总览
// ==========================================

use anyhow::{anyhow, Context};
use pt_visit_standards::app::{get_default_db_path, AppState};
use pt_visit_standards::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", pt_visit_standards::APP_NAME);
    tracing::info!("系统版本: {}", pt_visit_standards::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!("无法初始化AppState: {}", e))?;

    let summary = state
        .dashboard_api
        .summary()
        .await
        .context("读取总览数据失败")?;

    println!("排程: {} 条, 评估: {} 条", summary.schedules.len(), summary.assessment_count);
    for group in pt_visit_standards::ScheduleApi::group_by_month(&summary.schedules) {
        println!("{}-{:02}", group.year, group.month);
        for entry in &group.entries {
            let visitors: Vec<String> = entry.visitors().map(|f| f.to_string()).collect();
            println!("  {}  {} ← {}", entry.date(), entry.host(), visitors.join(", "));
        }
    }
    for average in &summary.facility_averages {
        println!(
            "{}: {} ({} 次)",
            average.hospital, average.average_score, average.assessment_count
        );
    }
    for grade in &summary.grade_distribution {
        println!("{}: {}", grade.grade.label(), grade.count);
    }

    Ok(())
}
