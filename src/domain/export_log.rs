// ==========================================
// 工厂员工技能矩阵管理系统 - 导出日志领域模型
// ==========================================

use crate::domain::types::ExportFormat;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ExportLog - 导出日志
// ==========================================
// 用途: 审计追踪（谁在何时导出了哪个矩阵）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportLog {
    pub export_id: String,
    pub matrix_id: Option<String>,
    pub export_format: ExportFormat,
    pub file_name: String,
    pub row_count: i64,
    pub exported_by: String,
    pub exported_at: NaiveDateTime,
}

impl ExportLog {
    pub fn new(
        matrix_id: Option<String>,
        export_format: ExportFormat,
        file_name: String,
        row_count: i64,
        exported_by: String,
    ) -> Self {
        Self {
            export_id: uuid::Uuid::new_v4().to_string(),
            matrix_id,
            export_format,
            file_name,
            row_count,
            exported_by,
            exported_at: chrono::Local::now().naive_local(),
        }
    }
}
