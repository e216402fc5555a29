// ==========================================
// 互访评估系统 - 本地回退存储
// ==========================================
// 存储: local_store 表，每类记录一个固定命名空间，payload 为 JSON 数组
// 红线: 不含业务逻辑，只负责数据访问
// ==========================================

use crate::repository::error::{GatewayError, GatewayResult};
use crate::repository::gateway::{PersistenceGateway, RecordKind};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::{Arc, Mutex};

// ==========================================
// LocalStore - 本地 key/value 存储
// ==========================================
#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStore {
    /// 打开本地库
    pub fn new(db_path: &str) -> GatewayResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> GatewayResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| GatewayError::LockError(e.to_string()))
    }

    /// 读取命名空间下的全部记录（命名空间不存在视为空）
    pub fn read_all(&self, kind: RecordKind) -> GatewayResult<Vec<Value>> {
        let conn = self.get_conn()?;
        Self::read_payload(&conn, kind)
    }

    /// 按主键替换或追加
    pub fn write_one(&self, kind: RecordKind, record: Value) -> GatewayResult<()> {
        let key = kind.record_key(&record)?;
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut records = Self::read_payload(&tx, kind)?;
        let existing = records
            .iter()
            .position(|r| kind.record_key(r).map(|k| k == key).unwrap_or(false));
        match existing {
            Some(index) => records[index] = record,
            None => records.push(record),
        }

        let payload = serde_json::to_string(&records)?;
        tx.execute(
            r#"
            INSERT INTO local_store (namespace, payload, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(namespace) DO UPDATE SET payload = ?2, updated_at = datetime('now')
            "#,
            params![kind.namespace(), payload],
        )?;
        tx.commit()?;

        tracing::debug!(kind = %kind, key = %key, replaced = existing.is_some(), "本地存储已写入");
        Ok(())
    }

    fn read_payload(conn: &Connection, kind: RecordKind) -> GatewayResult<Vec<Value>> {
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM local_store WHERE namespace = ?1",
                params![kind.namespace()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Value>(&payload) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(_) => Err(GatewayError::CorruptLocalData {
                namespace: kind.namespace().to_string(),
                message: "payload 不是 JSON 数组".to_string(),
            }),
            Err(e) => Err(GatewayError::CorruptLocalData {
                namespace: kind.namespace().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl PersistenceGateway for LocalStore {
    fn mode_name(&self) -> &'static str {
        "local"
    }

    async fn list(&self, kind: RecordKind) -> GatewayResult<Vec<Value>> {
        self.read_all(kind)
    }

    async fn upsert(&self, kind: RecordKind, record: Value) -> GatewayResult<()> {
        self.write_one(kind, record)
    }
}
