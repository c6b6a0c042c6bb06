// ==========================================
// 工厂员工技能矩阵管理系统 - 技能/机台数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::skill::{Machine, Skill};
use crate::repository::db_utils::{fmt_timestamp, get_timestamp};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SKILL_COLUMNS: &str =
    "skill_id, name, department_id, description, is_deleted, created_at, updated_at";

fn map_skill(row: &Row<'_>) -> SqliteResult<Skill> {
    Ok(Skill {
        skill_id: row.get(0)?,
        name: row.get(1)?,
        department_id: row.get(2)?,
        description: row.get(3)?,
        is_deleted: row.get(4)?,
        created_at: get_timestamp(row, 5)?,
        updated_at: get_timestamp(row, 6)?,
    })
}

// ==========================================
// SkillRepository - 技能仓储
// ==========================================
pub struct SkillRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SkillRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, skill: &Skill) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO skills (
                skill_id, name, department_id, description, is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                skill.skill_id,
                skill.name,
                skill.department_id,
                skill.description,
                skill.is_deleted,
                fmt_timestamp(&skill.created_at),
                fmt_timestamp(&skill.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, skill_id: &str) -> RepositoryResult<Option<Skill>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM skills WHERE skill_id = ?1 AND is_deleted = 0",
            SKILL_COLUMNS
        );
        Ok(conn.query_row(&sql, params![skill_id], map_skill).optional()?)
    }

    /// 查询技能
    ///
    /// 指定部门时返回该部门技能与通用技能（department_id 为空）
    pub fn list(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Skill>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM skills
            WHERE is_deleted = 0
              AND (?1 IS NULL OR department_id = ?1 OR department_id IS NULL)
            ORDER BY name ASC
            "#,
            SKILL_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let skills = stmt
            .query_map(params![department_id], map_skill)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(skills)
    }

    pub fn soft_delete(&self, skill_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE skills SET is_deleted = 1, updated_at = ?2 WHERE skill_id = ?1 AND is_deleted = 0",
            params![skill_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Skill", skill_id));
        }
        Ok(())
    }
}

// ==========================================
// MachineRepository - 机台仓储
// ==========================================
const MACHINE_COLUMNS: &str = r#"
    machine_id, name, department_id, is_critical_station, female_eligible,
    is_deleted, created_at, updated_at
"#;

fn map_machine(row: &Row<'_>) -> SqliteResult<Machine> {
    Ok(Machine {
        machine_id: row.get(0)?,
        name: row.get(1)?,
        department_id: row.get(2)?,
        is_critical_station: row.get(3)?,
        female_eligible: row.get(4)?,
        is_deleted: row.get(5)?,
        created_at: get_timestamp(row, 6)?,
        updated_at: get_timestamp(row, 7)?,
    })
}

pub struct MachineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, machine: &Machine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO machines (
                machine_id, name, department_id, is_critical_station, female_eligible,
                is_deleted, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                machine.machine_id,
                machine.name,
                machine.department_id,
                machine.is_critical_station,
                machine.female_eligible,
                machine.is_deleted,
                fmt_timestamp(&machine.created_at),
                fmt_timestamp(&machine.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, machine_id: &str) -> RepositoryResult<Option<Machine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM machines WHERE machine_id = ?1 AND is_deleted = 0",
            MACHINE_COLUMNS
        );
        Ok(conn.query_row(&sql, params![machine_id], map_machine).optional()?)
    }

    /// 查询机台（可按部门过滤）
    pub fn list(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM machines
            WHERE is_deleted = 0 AND (?1 IS NULL OR department_id = ?1)
            ORDER BY name ASC
            "#,
            MACHINE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let machines = stmt
            .query_map(params![department_id], map_machine)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(machines)
    }

    pub fn soft_delete(&self, machine_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE machines SET is_deleted = 1, updated_at = ?2 WHERE machine_id = ?1 AND is_deleted = 0",
            params![machine_id, crate::db::now_timestamp()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Machine", machine_id));
        }
        Ok(())
    }
}
