// ==========================================
// 工厂员工技能矩阵管理系统 - 部门绩效快照仓储
// ==========================================
// 约束: 每个 (department_id, month) 仅一条未删除记录（upsert 维护）
// ==========================================

use crate::domain::performance::DepartmentPerformance;
use crate::repository::db_utils::get_timestamp;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

fn map_performance(row: &Row<'_>) -> SqliteResult<DepartmentPerformance> {
    Ok(DepartmentPerformance {
        performance_id: row.get(0)?,
        department_id: row.get(1)?,
        month: row.get(2)?,
        score: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
        updated_at: get_timestamp(row, 5)?,
    })
}

pub struct DepartmentPerformanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentPerformanceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入或覆盖某部门某月的得分
    pub fn upsert(
        &self,
        department_id: &str,
        month: &str,
        score: f64,
    ) -> RepositoryResult<DepartmentPerformance> {
        let conn = self.get_conn()?;
        let now = crate::db::now_timestamp();

        let existing: Option<String> = conn
            .query_row(
                "SELECT performance_id FROM department_performance WHERE department_id = ?1 AND month = ?2 AND is_deleted = 0",
                params![department_id, month],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE department_performance SET score = ?2, updated_at = ?3 WHERE performance_id = ?1",
                    params![id, score, now],
                )?;
                id
            }
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                conn.execute(
                    r#"
                    INSERT INTO department_performance (
                        performance_id, department_id, month, score, is_deleted, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
                    "#,
                    params![id, department_id, month, score, now],
                )?;
                id
            }
        };

        conn.query_row(
            r#"
            SELECT performance_id, department_id, month, score, created_at, updated_at
            FROM department_performance WHERE performance_id = ?1
            "#,
            params![id],
            map_performance,
        )
        .map_err(Into::into)
    }

    /// 查询部门月度得分（按月份升序）
    pub fn list_by_department(&self, department_id: &str) -> RepositoryResult<Vec<DepartmentPerformance>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT performance_id, department_id, month, score, created_at, updated_at
            FROM department_performance
            WHERE department_id = ?1 AND is_deleted = 0
            ORDER BY month ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![department_id], map_performance)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}
