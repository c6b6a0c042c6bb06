// ==========================================
// 工厂员工技能矩阵管理系统 - 部门/主管数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 默认查询一律排除 is_deleted = 1 的记录
// ==========================================

use crate::domain::department::{Department, DepartmentWithCounts, Manager};
use crate::repository::db_utils::{fmt_timestamp, get_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const DEPARTMENT_COLUMNS: &str =
    "department_id, name, description, is_deleted, created_at, updated_at";

fn map_department(row: &Row<'_>) -> SqliteResult<Department> {
    Ok(Department {
        department_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        is_deleted: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
        updated_at: get_timestamp(row, 5)?,
    })
}

// ==========================================
// DepartmentRepository - 部门仓储
// ==========================================
/// 部门仓储
/// 职责: 管理 departments 表的 CRUD 操作
pub struct DepartmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建部门
    pub fn insert(&self, department: &Department) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO departments (
                department_id, name, description, is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                department.department_id,
                department.name,
                department.description,
                department.is_deleted,
                fmt_timestamp(&department.created_at),
                fmt_timestamp(&department.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 按 ID 查询（仅未删除）
    pub fn find_by_id(&self, department_id: &str) -> RepositoryResult<Option<Department>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM departments WHERE department_id = ?1 AND is_deleted = 0",
            DEPARTMENT_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![department_id], map_department)
            .optional()?)
    }

    /// 按名称查询（仅未删除，大小写不敏感）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Department>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM departments WHERE name = ?1 COLLATE NOCASE AND is_deleted = 0 LIMIT 1",
            DEPARTMENT_COLUMNS
        );
        Ok(conn.query_row(&sql, params![name], map_department).optional()?)
    }

    /// 查询全部未删除部门（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM departments WHERE is_deleted = 0 ORDER BY name ASC",
            DEPARTMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let departments = stmt
            .query_map([], map_department)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(departments)
    }

    /// 查询部门列表并附带员工/主管计数
    ///
    /// 计数口径: 未删除且 department_id 匹配的员工/主管
    pub fn list_with_counts(&self) -> RepositoryResult<Vec<DepartmentWithCounts>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                d.department_id, d.name, d.description, d.is_deleted, d.created_at, d.updated_at,
                (SELECT COUNT(*) FROM employees e
                  WHERE e.department_id = d.department_id AND e.is_deleted = 0) AS employee_count,
                (SELECT COUNT(*) FROM managers m
                  WHERE m.department_id = d.department_id AND m.is_deleted = 0) AS manager_count
            FROM departments d
            WHERE d.is_deleted = 0
            ORDER BY d.name ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(DepartmentWithCounts {
                    department: map_department(row)?,
                    employee_count: row.get(6)?,
                    manager_count: row.get(7)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 更新名称/描述
    pub fn update(&self, department: &Department) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE departments
            SET name = ?2, description = ?3, updated_at = ?4
            WHERE department_id = ?1 AND is_deleted = 0
            "#,
            params![
                department.department_id,
                department.name,
                department.description,
                fmt_timestamp(&department.updated_at),
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Department", &department.department_id));
        }
        Ok(())
    }

    /// 软删除
    pub fn soft_delete(&self, department_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE departments SET is_deleted = 1, updated_at = ?2 WHERE department_id = ?1 AND is_deleted = 0",
            params![department_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Department", department_id));
        }
        Ok(())
    }
}

// ==========================================
// ManagerRepository - 主管仓储
// ==========================================
const MANAGER_COLUMNS: &str =
    "manager_id, name, email, department_id, is_deleted, created_at, updated_at";

fn map_manager(row: &Row<'_>) -> SqliteResult<Manager> {
    Ok(Manager {
        manager_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        department_id: row.get(3)?,
        is_deleted: row.get(4)?,
        created_at: get_timestamp(row, 5)?,
        updated_at: get_timestamp(row, 6)?,
    })
}

pub struct ManagerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ManagerRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, manager: &Manager) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO managers (
                manager_id, name, email, department_id, is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                manager.manager_id,
                manager.name,
                manager.email,
                manager.department_id,
                manager.is_deleted,
                fmt_timestamp(&manager.created_at),
                fmt_timestamp(&manager.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, manager_id: &str) -> RepositoryResult<Option<Manager>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM managers WHERE manager_id = ?1 AND is_deleted = 0",
            MANAGER_COLUMNS
        );
        Ok(conn.query_row(&sql, params![manager_id], map_manager).optional()?)
    }

    /// 查询主管（可按部门过滤）
    pub fn list(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Manager>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM managers
            WHERE is_deleted = 0 AND (?1 IS NULL OR department_id = ?1)
            ORDER BY name ASC
            "#,
            MANAGER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let managers = stmt
            .query_map(params![department_id], map_manager)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(managers)
    }

    pub fn count_by_department(&self, department_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM managers WHERE department_id = ?1 AND is_deleted = 0",
            params![department_id],
            |row| row.get(0),
        )?)
    }

    pub fn soft_delete(&self, manager_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE managers SET is_deleted = 1, updated_at = ?2 WHERE manager_id = ?1 AND is_deleted = 0",
            params![manager_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Manager", manager_id));
        }
        Ok(())
    }
}
