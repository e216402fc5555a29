// ==========================================
// 互访评估系统 - 远程存储（HTTP）
// ==========================================
// 读取: GET  <url>?action=getSchedules|getAssessments → JSON 数组
// 写入: POST <url> multipart{action=saveSchedule|saveAssessment, data=<json>}
//       → {"success": true}
// 降级: 读失败时排程回退本地、评估返回空；写失败一律返回错误
// ==========================================

use crate::repository::error::{GatewayError, GatewayResult};
use crate::repository::gateway::{PersistenceGateway, RecordKind};
use crate::repository::local_store::LocalStore;
use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// 写入响应
#[derive(Debug, Deserialize)]
struct WriteAck {
    #[serde(default)]
    success: bool,
}

// ==========================================
// RemoteStore
// ==========================================
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    fallback: LocalStore,
}

impl RemoteStore {
    /// 创建远程存储
    ///
    /// # 参数
    /// - base_url: 远程脚本地址
    /// - timeout: 单次请求超时
    /// - fallback: 排程读失败时使用的本地存储
    pub fn new(base_url: &str, timeout: Duration, fallback: LocalStore) -> GatewayResult<Self> {
        let base_url = base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GatewayError::InvalidConfig(format!("远程地址无效: {}", base_url)));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            fallback,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 远程读取（不做降级）
    pub async fn fetch(&self, kind: RecordKind) -> GatewayResult<Vec<Value>> {
        let action = kind.read_action();
        let transport = |e: reqwest::Error| GatewayError::Transport {
            action: action.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", action)])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body: Value = response.json().await.map_err(transport)?;
        match body {
            Value::Array(records) => Ok(records),
            other => {
                tracing::warn!(action, body = %other, "远程返回非数组，按空处理");
                Ok(Vec::new())
            }
        }
    }

    /// 远程写入
    pub async fn push(&self, kind: RecordKind, record: &Value) -> GatewayResult<()> {
        let action = kind.write_action();
        let transport = |e: reqwest::Error| GatewayError::Transport {
            action: action.to_string(),
            message: e.to_string(),
        };

        let form = Form::new()
            .text("action", action)
            .text("data", serde_json::to_string(record)?);

        let response = self
            .client
            .post(&self.base_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let body = response.text().await.map_err(transport)?;
        match serde_json::from_str::<WriteAck>(&body) {
            Ok(WriteAck { success: true }) => Ok(()),
            _ => Err(GatewayError::RemoteRejected {
                action: action.to_string(),
                body,
            }),
        }
    }
}

#[async_trait]
impl PersistenceGateway for RemoteStore {
    fn mode_name(&self) -> &'static str {
        "remote"
    }

    async fn list(&self, kind: RecordKind) -> GatewayResult<Vec<Value>> {
        match self.fetch(kind).await {
            Ok(records) => Ok(records),
            Err(e) => match kind {
                RecordKind::Schedule => {
                    tracing::warn!(error = %e, "远程读取排程失败，回退本地存储");
                    self.fallback.read_all(kind)
                }
                RecordKind::Assessment => {
                    tracing::warn!(error = %e, "远程读取评估记录失败，返回空列表");
                    Ok(Vec::new())
                }
            },
        }
    }

    async fn upsert(&self, kind: RecordKind, record: Value) -> GatewayResult<()> {
        self.push(kind, &record).await.map_err(|e| {
            tracing::error!(kind = %kind, error = %e, "远程写入失败");
            e
        })
    }
}
