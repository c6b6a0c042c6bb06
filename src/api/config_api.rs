// ==========================================
// 工厂员工技能矩阵管理系统 - 配置 API
// ==========================================
// 职责: 运行时配置（config_kv）的读取与修改
// ==========================================

use std::sync::Arc;

use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, ConfigEntry, ConfigManager};
use crate::repository::RepositoryError;

/// 修改配置请求
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConfigRequest {
    pub value: String,
}

pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    pub fn list_configs(&self) -> ApiResult<Vec<ConfigEntry>> {
        Ok(self.config_manager.list_entries()?)
    }

    pub fn get_config(&self, key: &str) -> ApiResult<ConfigEntry> {
        if !config_keys::ALL.contains(&key) {
            return Err(ApiError::NotFound(format!("配置项不存在: {}", key)));
        }
        Ok(self.config_manager.get_entry(key)?)
    }

    pub fn update_config(&self, key: &str, request: UpdateConfigRequest) -> ApiResult<ConfigEntry> {
        if !config_keys::ALL.contains(&key) {
            return Err(ApiError::NotFound(format!("配置项不存在: {}", key)));
        }
        self.config_manager
            .set_value(key, &request.value)
            .map_err(|e| match e {
                RepositoryError::FieldValueError { message, .. } => ApiError::InvalidInput(message),
                other => other.into(),
            })
    }
}
