// ==========================================
// 工厂员工技能矩阵管理系统 - 员工作业记录仓储
// ==========================================

use crate::domain::work_history::EmployeeWorkHistory;
use crate::repository::db_utils::{build_in_clause, fmt_timestamp, get_date, get_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, params_from_iter, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

fn map_history(row: &Row<'_>) -> SqliteResult<EmployeeWorkHistory> {
    Ok(EmployeeWorkHistory {
        history_id: row.get(0)?,
        employee_id: row.get(1)?,
        machine_id: row.get(2)?,
        department_id: row.get(3)?,
        work_date: get_date(row, 4)?,
        shift: row.get(5)?,
        hours_worked: row.get(6)?,
        notes: row.get(7)?,
        is_deleted: row.get(8)?,
        created_at: get_timestamp(row, 9)?,
        updated_at: get_timestamp(row, 10)?,
    })
}

// ==========================================
// WorkHistoryRepository - 作业记录仓储
// ==========================================
pub struct WorkHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkHistoryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, history: &EmployeeWorkHistory) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employee_work_history (
                history_id, employee_id, machine_id, department_id, work_date, shift,
                hours_worked, notes, is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                history.history_id,
                history.employee_id,
                history.machine_id,
                history.department_id,
                history.work_date.to_string(),
                history.shift,
                history.hours_worked,
                history.notes,
                history.is_deleted,
                fmt_timestamp(&history.created_at),
                fmt_timestamp(&history.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 批量查询员工作业记录（按日期倒序）
    pub fn list_by_employees(
        &self,
        employee_ids: &[String],
    ) -> RepositoryResult<Vec<EmployeeWorkHistory>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT
                history_id, employee_id, machine_id, department_id, work_date, shift,
                hours_worked, notes, is_deleted, created_at, updated_at
            FROM employee_work_history
            WHERE is_deleted = 0 AND {}
            ORDER BY work_date DESC, created_at DESC
            "#,
            build_in_clause("employee_id", employee_ids)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(employee_ids.iter()), map_history)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn soft_delete(&self, history_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE employee_work_history SET is_deleted = 1, updated_at = ?2 WHERE history_id = ?1 AND is_deleted = 0",
            params![history_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("EmployeeWorkHistory", history_id));
        }
        Ok(())
    }
}
