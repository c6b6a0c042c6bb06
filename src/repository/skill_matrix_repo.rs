// ==========================================
// 工厂员工技能矩阵管理系统 - 技能矩阵快照仓储
// ==========================================
// 存储: 列/行/部门以 JSON 文本存储（反范式快照）
// ==========================================

use crate::domain::skill_matrix::SkillMatrix;
use crate::repository::db_utils::{fmt_timestamp, get_json, get_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const MATRIX_COLUMNS: &str = r#"
    matrix_id, name, department_ids_json, columns_json, rows_json, created_by,
    is_deleted, created_at, updated_at
"#;

fn map_matrix(row: &Row<'_>) -> SqliteResult<SkillMatrix> {
    Ok(SkillMatrix {
        matrix_id: row.get(0)?,
        name: row.get(1)?,
        department_ids: get_json(row, 2)?,
        columns: get_json(row, 3)?,
        rows: get_json(row, 4)?,
        created_by: row.get(5)?,
        is_deleted: row.get(6)?,
        created_at: get_timestamp(row, 7)?,
        updated_at: get_timestamp(row, 8)?,
    })
}

// ==========================================
// SkillMatrixRepository - 技能矩阵仓储
// ==========================================
pub struct SkillMatrixRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SkillMatrixRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, matrix: &SkillMatrix) -> RepositoryResult<()> {
        let department_ids_json = serde_json::to_string(&matrix.department_ids)?;
        let columns_json = serde_json::to_string(&matrix.columns)?;
        let rows_json = serde_json::to_string(&matrix.rows)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO skill_matrices (
                matrix_id, name, department_ids_json, columns_json, rows_json, created_by,
                is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                matrix.matrix_id,
                matrix.name,
                department_ids_json,
                columns_json,
                rows_json,
                matrix.created_by,
                matrix.is_deleted,
                fmt_timestamp(&matrix.created_at),
                fmt_timestamp(&matrix.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, matrix_id: &str) -> RepositoryResult<Option<SkillMatrix>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM skill_matrices WHERE matrix_id = ?1 AND is_deleted = 0",
            MATRIX_COLUMNS
        );
        Ok(conn.query_row(&sql, params![matrix_id], map_matrix).optional()?)
    }

    /// 查询全部矩阵（按创建时间倒序）
    pub fn list(&self) -> RepositoryResult<Vec<SkillMatrix>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM skill_matrices WHERE is_deleted = 0 ORDER BY created_at DESC, name ASC",
            MATRIX_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_matrix)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn soft_delete(&self, matrix_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE skill_matrices SET is_deleted = 1, updated_at = ?2 WHERE matrix_id = ?1 AND is_deleted = 0",
            params![matrix_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("SkillMatrix", matrix_id));
        }
        Ok(())
    }
}
