// ==========================================
// 工厂员工技能矩阵管理系统 - 示例数据 API
// ==========================================
// 职责: 在单个事务内写入演示数据（部门/主管/机台/技能/员工/技能等级/作业记录）
// 约束: 已有未删除部门时拒绝写入，除非 reset = true（先清空业务表）
// 数据: 确定性生成，重复执行结果一致（ID 除外）
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::{Duration, Local};
use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::{Gender, SkillLevel};

/// 演示部门: (名称, 描述, 机台[(名称, 关键工位, 女性可上岗)])
const SEED_DEPARTMENTS: [(&str, &str, [(&str, bool, bool); 3]); 4] = [
    (
        "冲压车间",
        "板材冲压与落料",
        [("2000T 冲压线", true, true), ("开卷落料线", false, true), ("模具维修台", false, false)],
    ),
    (
        "焊装车间",
        "白车身焊接",
        [("机器人焊接站", true, true), ("点焊工位", false, true), ("补焊工位", false, false)],
    ),
    (
        "涂装车间",
        "前处理、电泳与喷涂",
        [("电泳线", true, true), ("喷涂机器人", false, true), ("打磨工位", false, true)],
    ),
    (
        "总装车间",
        "整车装配与下线检测",
        [("底盘合装线", true, false), ("内饰装配线", false, true), ("下线检测线", true, true)],
    ),
];

/// 通用技能
const SEED_SKILLS: [(&str, &str); 4] = [
    ("安全操作规程", "岗位安全与应急处置"),
    ("图纸识读", "工艺图纸与作业指导书识读"),
    ("质量检验", "首件检验与过程巡检"),
    ("5S 管理", "现场整理整顿"),
];

const SURNAMES: [&str; 8] = ["王", "李", "张", "刘", "陈", "杨", "赵", "黄"];
const GIVEN_NAMES: [&str; 6] = ["伟", "芳", "强", "敏", "磊", "静"];
const EXPERIENCE_YEARS: [f64; 6] = [0.5, 1.5, 3.0, 4.5, 7.0, 12.0];
const DESIGNATIONS: [&str; 3] = ["操作工", "技术员", "班组长"];

/// 每个部门的员工数
pub const EMPLOYEES_PER_DEPARTMENT: usize = 6;
/// 每名员工的作业记录天数
pub const WORK_HISTORY_DAYS: i64 = 5;

/// 写入统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedReport {
    pub departments: usize,
    pub managers: usize,
    pub machines: usize,
    pub skills: usize,
    pub employees: usize,
    pub employee_skills: usize,
    pub work_history: usize,
}

/// 清空全部业务表（按外键依赖顺序）
fn clear_business_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM employee_skills;
        DELETE FROM employee_work_history;
        DELETE FROM department_performance;
        DELETE FROM export_logs;
        DELETE FROM skill_matrices;
        DELETE FROM employees;
        DELETE FROM managers;
        DELETE FROM machines;
        DELETE FROM skills;
        DELETE FROM departments;
        "#,
    )
}

fn gender_for(index: usize) -> Gender {
    if index % 3 == 1 {
        Gender::Female
    } else {
        Gender::Male
    }
}

/// 写入演示数据
///
/// # 参数
/// - conn: 数据库连接（函数内部开启事务）
/// - reset: 是否先清空业务表
///
/// # 返回
/// - Ok(None): 已有部门且未要求 reset，未写入
/// - Ok(Some(SeedReport)): 写入统计
pub fn seed_sample_data(conn: &Connection, reset: bool) -> rusqlite::Result<Option<SeedReport>> {
    let tx = conn.unchecked_transaction()?;

    let live_departments: i64 = tx.query_row(
        "SELECT COUNT(*) FROM departments WHERE is_deleted = 0",
        [],
        |row| row.get(0),
    )?;
    if live_departments > 0 && !reset {
        return Ok(None);
    }
    if reset {
        clear_business_tables(&tx)?;
    }

    let now = Local::now().naive_local();
    let now_str = now.format(crate::db::TIMESTAMP_FORMAT).to_string();
    let today = now.date();
    let mut report = SeedReport::default();

    // ===== 通用技能 =====
    let mut skill_ids = Vec::with_capacity(SEED_SKILLS.len());
    for (name, description) in SEED_SKILLS {
        let skill_id = Uuid::new_v4().to_string();
        tx.execute(
            r#"
            INSERT INTO skills (skill_id, name, department_id, description, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, NULL, ?3, 0, ?4, ?4)
            "#,
            params![skill_id, name, description, now_str],
        )?;
        skill_ids.push(skill_id);
        report.skills += 1;
    }

    let mut employee_seq = 0usize;
    for (dept_idx, (dept_name, dept_desc, machines)) in SEED_DEPARTMENTS.iter().enumerate() {
        // ===== 部门 =====
        let department_id = Uuid::new_v4().to_string();
        tx.execute(
            r#"
            INSERT INTO departments (department_id, name, description, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4, ?4)
            "#,
            params![department_id, dept_name, dept_desc, now_str],
        )?;
        report.departments += 1;

        // ===== 主管 =====
        let manager_id = Uuid::new_v4().to_string();
        tx.execute(
            r#"
            INSERT INTO managers (manager_id, name, email, department_id, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
            "#,
            params![
                manager_id,
                format!("{}主管", dept_name),
                format!("manager{}@factory.example", dept_idx + 1),
                department_id,
                now_str
            ],
        )?;
        report.managers += 1;

        // ===== 机台 =====
        let mut machine_rows = Vec::with_capacity(machines.len());
        for (name, critical, female_eligible) in machines.iter() {
            let machine_id = Uuid::new_v4().to_string();
            tx.execute(
                r#"
                INSERT INTO machines (
                    machine_id, name, department_id, is_critical_station, female_eligible,
                    is_deleted, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)
                "#,
                params![machine_id, name, department_id, critical, female_eligible, now_str],
            )?;
            machine_rows.push((machine_id, *female_eligible));
            report.machines += 1;
        }

        // ===== 员工 =====
        for emp_idx in 0..EMPLOYEES_PER_DEPARTMENT {
            employee_seq += 1;
            let employee_id = Uuid::new_v4().to_string();
            let gender = gender_for(emp_idx);
            let years = EXPERIENCE_YEARS[emp_idx % EXPERIENCE_YEARS.len()];
            let joining_date = today - Duration::days((years * 365.0) as i64);
            let name = format!(
                "{}{}",
                SURNAMES[employee_seq % SURNAMES.len()],
                GIVEN_NAMES[emp_idx % GIVEN_NAMES.len()]
            );

            tx.execute(
                r#"
                INSERT INTO employees (
                    employee_id, employee_code, name, gender, department_id, manager_id,
                    designation, joining_date, experience_years, is_deleted, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?10)
                "#,
                params![
                    employee_id,
                    format!("EMP-{:04}", employee_seq),
                    name,
                    gender.as_str(),
                    department_id,
                    manager_id,
                    DESIGNATIONS[emp_idx % DESIGNATIONS.len()],
                    joining_date.to_string(),
                    years,
                    now_str
                ],
            )?;
            report.employees += 1;

            // ===== 机台技能等级 =====
            for (machine_idx, (machine_id, female_eligible)) in machine_rows.iter().enumerate() {
                if gender == Gender::Female && !female_eligible {
                    continue;
                }
                let level = SkillLevel::from_score(((emp_idx + machine_idx * 2 + dept_idx) % 5) as i64);
                tx.execute(
                    r#"
                    INSERT INTO employee_skills (
                        employee_skill_id, employee_id, skill_id, machine_id, level,
                        assessed_at, is_deleted, created_at, updated_at
                    ) VALUES (?1, ?2, NULL, ?3, ?4, ?5, 0, ?5, ?5)
                    "#,
                    params![Uuid::new_v4().to_string(), employee_id, machine_id, level.as_str(), now_str],
                )?;
                report.employee_skills += 1;
            }

            // ===== 通用技能等级 =====
            for (skill_idx, skill_id) in skill_ids.iter().enumerate() {
                let level = SkillLevel::from_score(((emp_idx + skill_idx) % 4 + 1) as i64);
                tx.execute(
                    r#"
                    INSERT INTO employee_skills (
                        employee_skill_id, employee_id, skill_id, machine_id, level,
                        assessed_at, is_deleted, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, NULL, ?4, ?5, 0, ?5, ?5)
                    "#,
                    params![Uuid::new_v4().to_string(), employee_id, skill_id, level.as_str(), now_str],
                )?;
                report.employee_skills += 1;
            }

            // ===== 作业记录 =====
            let (machine_id, _) = &machine_rows[emp_idx % machine_rows.len()];
            for day in 1..=WORK_HISTORY_DAYS {
                let work_date = today - Duration::days(day);
                let shift = if emp_idx % 2 == 0 { "白班" } else { "夜班" };
                tx.execute(
                    r#"
                    INSERT INTO employee_work_history (
                        history_id, employee_id, machine_id, department_id, work_date, shift,
                        hours_worked, notes, is_deleted, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, 0, ?8, ?8)
                    "#,
                    params![
                        Uuid::new_v4().to_string(),
                        employee_id,
                        machine_id,
                        department_id,
                        work_date.to_string(),
                        shift,
                        8.0_f64,
                        now_str
                    ],
                )?;
                report.work_history += 1;
            }
        }
    }

    tx.commit()?;
    Ok(Some(report))
}

// ==========================================
// SeedApi - 示例数据 API
// ==========================================
pub struct SeedApi {
    conn: Arc<Mutex<Connection>>,
}

impl SeedApi {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 写入演示数据
    ///
    /// # 返回
    /// - Err(ApiError::Conflict): 已有部门且 reset = false
    pub fn seed_database(&self, reset: bool) -> ApiResult<SeedReport> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", e)))?;

        let report = seed_sample_data(&conn, reset)
            .map_err(|e| ApiError::DatabaseTransactionError(e.to_string()))?
            .ok_or_else(|| {
                ApiError::Conflict("数据库已有部门数据，如需重建请使用 reset=true".to_string())
            })?;

        info!(
            departments = report.departments,
            employees = report.employees,
            employee_skills = report.employee_skills,
            reset,
            "演示数据已写入"
        );
        Ok(report)
    }
}
