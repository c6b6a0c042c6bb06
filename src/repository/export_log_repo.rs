// ==========================================
// 工厂员工技能矩阵管理系统 - 导出日志仓储
// ==========================================
// 红线: 导出日志只追加，不更新
// ==========================================

use crate::domain::export_log::ExportLog;
use crate::repository::db_utils::{fmt_timestamp, get_enum, get_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

fn map_export_log(row: &Row<'_>) -> SqliteResult<ExportLog> {
    Ok(ExportLog {
        export_id: row.get(0)?,
        matrix_id: row.get(1)?,
        export_format: get_enum(row, 2)?,
        file_name: row.get(3)?,
        row_count: row.get(4)?,
        exported_by: row.get(5)?,
        exported_at: get_timestamp(row, 6)?,
    })
}

pub struct ExportLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ExportLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, log: &ExportLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let ts = fmt_timestamp(&log.exported_at);
        conn.execute(
            r#"
            INSERT INTO export_logs (
                export_id, matrix_id, export_format, file_name, row_count, exported_by,
                exported_at, is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?7, ?7)
            "#,
            params![
                log.export_id,
                log.matrix_id,
                log.export_format.as_str(),
                log.file_name,
                log.row_count,
                log.exported_by,
                ts,
            ],
        )?;
        Ok(())
    }

    /// 查询导出日志（可按矩阵过滤，按时间倒序）
    pub fn list(&self, matrix_id: Option<&str>, limit: i64) -> RepositoryResult<Vec<ExportLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT export_id, matrix_id, export_format, file_name, row_count, exported_by, exported_at
            FROM export_logs
            WHERE is_deleted = 0 AND (?1 IS NULL OR matrix_id = ?1)
            ORDER BY exported_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )?;
        let rows = stmt
            .query_map(params![matrix_id, limit], map_export_log)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}
