// ==========================================
// 工厂员工技能矩阵管理系统 - 技能/机台/员工技能领域模型
// ==========================================

use crate::domain::types::SkillLevel;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Skill - 技能
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: String,
    pub name: String,
    pub department_id: Option<String>, // None 表示通用技能
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Skill {
    pub fn new(name: String, department_id: Option<String>, description: Option<String>) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            skill_id: uuid::Uuid::new_v4().to_string(),
            name,
            department_id,
            description,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// Machine - 机台/工位
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub machine_id: String,
    pub name: String,
    pub department_id: String,
    pub is_critical_station: bool, // 关键工位
    pub female_eligible: bool,     // 女性员工可上岗
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Machine {
    pub fn new(
        name: String,
        department_id: String,
        is_critical_station: bool,
        female_eligible: bool,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            machine_id: uuid::Uuid::new_v4().to_string(),
            name,
            department_id,
            is_critical_station,
            female_eligible,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// EmployeeSkill - 员工技能（关联实体，携带熟练度）
// ==========================================
// 约束: skill_id / machine_id 至少一个非空
// 约束: 每个 (employee, skill, machine) 仅一条未删除记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSkill {
    pub employee_skill_id: String,
    pub employee_id: String,
    pub skill_id: Option<String>,
    pub machine_id: Option<String>,
    pub level: SkillLevel,
    pub assessed_at: NaiveDateTime,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl EmployeeSkill {
    pub fn new(
        employee_id: String,
        skill_id: Option<String>,
        machine_id: Option<String>,
        level: SkillLevel,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            employee_skill_id: uuid::Uuid::new_v4().to_string(),
            employee_id,
            skill_id,
            machine_id,
            level,
            assessed_at: now,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
