// ==========================================
// 工厂员工技能矩阵管理系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 默认查询一律排除 is_deleted = 1 的记录
// ==========================================

use crate::domain::employee::Employee;
use crate::repository::db_utils::{fmt_timestamp, get_enum, get_opt_date, get_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const EMPLOYEE_COLUMNS: &str = r#"
    employee_id, employee_code, name, gender, department_id, manager_id,
    designation, joining_date, experience_years, is_deleted, created_at, updated_at
"#;

fn map_employee(row: &Row<'_>) -> SqliteResult<Employee> {
    Ok(Employee {
        employee_id: row.get(0)?,
        employee_code: row.get(1)?,
        name: row.get(2)?,
        gender: get_enum(row, 3)?,
        department_id: row.get(4)?,
        manager_id: row.get(5)?,
        designation: row.get(6)?,
        joining_date: get_opt_date(row, 7)?,
        experience_years: row.get(8)?,
        is_deleted: row.get(9)?,
        created_at: get_timestamp(row, 10)?,
        updated_at: get_timestamp(row, 11)?,
    })
}

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employees (
                employee_id, employee_code, name, gender, department_id, manager_id,
                designation, joining_date, experience_years, is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                employee.employee_id,
                employee.employee_code,
                employee.name,
                employee.gender.as_str(),
                employee.department_id,
                employee.manager_id,
                employee.designation,
                employee.joining_date.map(|d| d.to_string()),
                employee.experience_years,
                employee.is_deleted,
                fmt_timestamp(&employee.created_at),
                fmt_timestamp(&employee.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, employee_id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM employees WHERE employee_id = ?1 AND is_deleted = 0",
            EMPLOYEE_COLUMNS
        );
        Ok(conn.query_row(&sql, params![employee_id], map_employee).optional()?)
    }

    /// 按工号查询（仅未删除，忽略大小写）
    pub fn find_by_code(&self, employee_code: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM employees WHERE employee_code = ?1 COLLATE NOCASE AND is_deleted = 0",
            EMPLOYEE_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![employee_code], map_employee)
            .optional()?)
    }

    /// 查询员工（可按部门过滤）
    pub fn list(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM employees
            WHERE is_deleted = 0 AND (?1 IS NULL OR department_id = ?1)
            ORDER BY employee_code ASC
            "#,
            EMPLOYEE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map(params![department_id], map_employee)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(employees)
    }

    pub fn update(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE employees SET
                employee_code = ?2, name = ?3, gender = ?4, department_id = ?5,
                manager_id = ?6, designation = ?7, joining_date = ?8,
                experience_years = ?9, updated_at = ?10
            WHERE employee_id = ?1 AND is_deleted = 0
            "#,
            params![
                employee.employee_id,
                employee.employee_code,
                employee.name,
                employee.gender.as_str(),
                employee.department_id,
                employee.manager_id,
                employee.designation,
                employee.joining_date.map(|d| d.to_string()),
                employee.experience_years,
                fmt_timestamp(&employee.updated_at),
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Employee", &employee.employee_id));
        }
        Ok(())
    }

    pub fn soft_delete(&self, employee_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE employees SET is_deleted = 1, updated_at = ?2 WHERE employee_id = ?1 AND is_deleted = 0",
            params![employee_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Employee", employee_id));
        }
        Ok(())
    }

    pub fn count_by_department(&self, department_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM employees WHERE department_id = ?1 AND is_deleted = 0",
            params![department_id],
            |row| row.get(0),
        )?)
    }
}
