// ==========================================
// 工厂员工技能矩阵管理系统 - 运行期配置管理器
// ==========================================
// 职责: 运行期业务参数的读取、校验与覆写
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use crate::domain::types::SkillLevel;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 配置键
pub mod config_keys {
    /// 视为“合格”的最低技能等级
    pub const QUALIFIED_MIN_LEVEL: &str = "qualified_min_level";
    /// 关键工位最少合格人数
    pub const MIN_QUALIFIED_PER_CRITICAL_STATION: &str = "min_qualified_per_critical_station";

    pub const ALL: [&str; 2] = [QUALIFIED_MIN_LEVEL, MIN_QUALIFIED_PER_CRITICAL_STATION];
}

/// 默认值
pub const DEFAULT_QUALIFIED_MIN_LEVEL: SkillLevel = SkillLevel::Medium;
pub const DEFAULT_MIN_QUALIFIED_PER_CRITICAL_STATION: i64 = 2;

/// 单个配置项（含是否为默认值）
#[derive(Debug, Clone, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub is_default: bool,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        Ok(conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    /// 合格等级阈值
    ///
    /// 配置缺失或无法解析时回退默认值（Medium）
    pub fn qualified_min_level(&self) -> RepositoryResult<SkillLevel> {
        let value = self.get_config_value(config_keys::QUALIFIED_MIN_LEVEL)?;
        Ok(match value {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("配置 {} 值无效: {}，使用默认值", config_keys::QUALIFIED_MIN_LEVEL, raw);
                DEFAULT_QUALIFIED_MIN_LEVEL
            }),
            None => DEFAULT_QUALIFIED_MIN_LEVEL,
        })
    }

    /// 关键工位最少合格人数
    pub fn min_qualified_per_critical_station(&self) -> RepositoryResult<i64> {
        let value = self.get_config_value(config_keys::MIN_QUALIFIED_PER_CRITICAL_STATION)?;
        Ok(value
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(DEFAULT_MIN_QUALIFIED_PER_CRITICAL_STATION))
    }

    /// 读取单个配置项（未配置时返回默认值）
    pub fn get_entry(&self, key: &str) -> RepositoryResult<ConfigEntry> {
        let default = default_value(key).ok_or_else(|| RepositoryError::FieldValueError {
            field: "key".to_string(),
            message: format!("未知配置项: {}", key),
        })?;

        Ok(match self.get_config_value(key)? {
            Some(value) => ConfigEntry {
                key: key.to_string(),
                value,
                is_default: false,
            },
            None => ConfigEntry {
                key: key.to_string(),
                value: default,
                is_default: true,
            },
        })
    }

    /// 列出全部配置项
    pub fn list_entries(&self) -> RepositoryResult<Vec<ConfigEntry>> {
        config_keys::ALL.iter().map(|k| self.get_entry(k)).collect()
    }

    /// 写入配置项（校验键与值）
    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<ConfigEntry> {
        validate_value(key, value)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now', 'localtime'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now', 'localtime')
            "#,
            params![key, value.trim()],
        )?;
        drop(conn);

        tracing::info!("配置已更新: {} = {}", key, value.trim());
        self.get_entry(key)
    }

    /// 当前全部配置的快照
    pub fn snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        Ok(self
            .list_entries()?
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect())
    }
}

fn default_value(key: &str) -> Option<String> {
    match key {
        config_keys::QUALIFIED_MIN_LEVEL => Some(DEFAULT_QUALIFIED_MIN_LEVEL.to_string()),
        config_keys::MIN_QUALIFIED_PER_CRITICAL_STATION => {
            Some(DEFAULT_MIN_QUALIFIED_PER_CRITICAL_STATION.to_string())
        }
        _ => None,
    }
}

fn validate_value(key: &str, value: &str) -> RepositoryResult<()> {
    let invalid = |message: String| RepositoryError::FieldValueError {
        field: key.to_string(),
        message,
    };

    match key {
        config_keys::QUALIFIED_MIN_LEVEL => value
            .parse::<SkillLevel>()
            .map(|_| ())
            .map_err(|e| invalid(e.to_string())),
        config_keys::MIN_QUALIFIED_PER_CRITICAL_STATION => match value.trim().parse::<i64>() {
            Ok(v) if v >= 0 => Ok(()),
            _ => Err(invalid(format!("需要非负整数，实际 '{}'", value))),
        },
        _ => Err(invalid(format!("未知配置项: {}", key))),
    }
}
