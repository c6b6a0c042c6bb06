// ==========================================
// 工厂员工技能矩阵管理系统 - 员工技能数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 每个 (employee, skill, machine) 仅一条未删除记录（upsert 维护）
// 约束: 员工/技能/机台任一方已软删除的记录不参与查询
// ==========================================

use crate::domain::skill::EmployeeSkill;
use crate::domain::types::SkillLevel;
use crate::repository::db_utils::{build_in_clause, fmt_timestamp, get_enum, get_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const LIVE_SKILL_SELECT: &str = r#"
    SELECT
        es.employee_skill_id, es.employee_id, es.skill_id, es.machine_id, es.level,
        es.assessed_at, es.is_deleted, es.created_at, es.updated_at
    FROM employee_skills es
    JOIN employees e ON e.employee_id = es.employee_id AND e.is_deleted = 0
    LEFT JOIN skills s ON s.skill_id = es.skill_id
    LEFT JOIN machines m ON m.machine_id = es.machine_id
    WHERE es.is_deleted = 0
      AND (es.skill_id IS NULL OR s.is_deleted = 0)
      AND (es.machine_id IS NULL OR m.is_deleted = 0)
"#;

fn map_employee_skill(row: &Row<'_>) -> SqliteResult<EmployeeSkill> {
    Ok(EmployeeSkill {
        employee_skill_id: row.get(0)?,
        employee_id: row.get(1)?,
        skill_id: row.get(2)?,
        machine_id: row.get(3)?,
        level: get_enum(row, 4)?,
        assessed_at: get_timestamp(row, 5)?,
        is_deleted: row.get(6)?,
        created_at: get_timestamp(row, 7)?,
        updated_at: get_timestamp(row, 8)?,
    })
}

// ==========================================
// EmployeeSkillRepository - 员工技能仓储
// ==========================================
pub struct EmployeeSkillRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeSkillRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入或更新员工技能等级
    ///
    /// # 返回
    /// 写入后的记录（已存在时保留原 ID，刷新 level/assessed_at）
    pub fn upsert(
        &self,
        employee_id: &str,
        skill_id: Option<&str>,
        machine_id: Option<&str>,
        level: SkillLevel,
    ) -> RepositoryResult<EmployeeSkill> {
        if skill_id.is_none() && machine_id.is_none() {
            return Err(RepositoryError::ValidationError(
                "skill_id 与 machine_id 不能同时为空".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        let now = crate::db::now_timestamp();

        let existing: Option<String> = conn
            .query_row(
                r#"
                SELECT employee_skill_id FROM employee_skills
                WHERE employee_id = ?1
                  AND IFNULL(skill_id, '') = IFNULL(?2, '')
                  AND IFNULL(machine_id, '') = IFNULL(?3, '')
                  AND is_deleted = 0
                "#,
                params![employee_id, skill_id, machine_id],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => {
                conn.execute(
                    r#"
                    UPDATE employee_skills
                    SET level = ?2, assessed_at = ?3, updated_at = ?3
                    WHERE employee_skill_id = ?1
                    "#,
                    params![id, level.as_str(), now],
                )?;
                id
            }
            None => {
                let record = EmployeeSkill::new(
                    employee_id.to_string(),
                    skill_id.map(str::to_string),
                    machine_id.map(str::to_string),
                    level,
                );
                conn.execute(
                    r#"
                    INSERT INTO employee_skills (
                        employee_skill_id, employee_id, skill_id, machine_id, level,
                        assessed_at, is_deleted, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)
                    "#,
                    params![
                        record.employee_skill_id,
                        record.employee_id,
                        record.skill_id,
                        record.machine_id,
                        record.level.as_str(),
                        fmt_timestamp(&record.assessed_at),
                        fmt_timestamp(&record.created_at),
                        fmt_timestamp(&record.updated_at),
                    ],
                )?;
                record.employee_skill_id
            }
        };

        conn.query_row(
            r#"
            SELECT employee_skill_id, employee_id, skill_id, machine_id, level,
                   assessed_at, is_deleted, created_at, updated_at
            FROM employee_skills WHERE employee_skill_id = ?1
            "#,
            params![id],
            map_employee_skill,
        )
        .map_err(Into::into)
    }

    /// 查询单个员工的技能
    pub fn list_by_employee(&self, employee_id: &str) -> RepositoryResult<Vec<EmployeeSkill>> {
        self.list_by_employees(&[employee_id.to_string()])
    }

    /// 批量查询员工技能
    pub fn list_by_employees(&self, employee_ids: &[String]) -> RepositoryResult<Vec<EmployeeSkill>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} AND {} ORDER BY es.employee_id, es.assessed_at",
            LIVE_SKILL_SELECT,
            build_in_clause("es.employee_id", employee_ids)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(employee_ids.iter()), map_employee_skill)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 查询部门内员工的全部技能
    pub fn list_by_department(&self, department_id: &str) -> RepositoryResult<Vec<EmployeeSkill>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} AND e.department_id = ?1 ORDER BY es.employee_id",
            LIVE_SKILL_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![department_id], map_employee_skill)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 查询机台上的全部员工技能
    pub fn list_by_machine(&self, machine_id: &str) -> RepositoryResult<Vec<EmployeeSkill>> {
        let conn = self.get_conn()?;
        let sql = format!("{} AND es.machine_id = ?1 ORDER BY es.employee_id", LIVE_SKILL_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![machine_id], map_employee_skill)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 查询全部有效员工技能
    pub fn list_all(&self) -> RepositoryResult<Vec<EmployeeSkill>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(LIVE_SKILL_SELECT)?;
        let rows = stmt
            .query_map([], map_employee_skill)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn soft_delete(&self, employee_skill_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE employee_skills SET is_deleted = 1, updated_at = ?2 WHERE employee_skill_id = ?1 AND is_deleted = 0",
            params![employee_skill_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("EmployeeSkill", employee_skill_id));
        }
        Ok(())
    }
}
