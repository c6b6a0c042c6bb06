// ==========================================
// 工厂员工技能矩阵管理系统 - 员工领域模型
// ==========================================

use crate::domain::types::{ExperienceBand, Gender};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Employee - 员工
// ==========================================
// 约束: 未删除记录中 employee_code 唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub employee_code: String, // 工号
    pub name: String,
    pub gender: Gender,
    pub department_id: String,
    pub manager_id: Option<String>,
    pub designation: Option<String>, // 岗位
    pub joining_date: Option<NaiveDate>,
    pub experience_years: f64, // 工龄（年）
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Employee {
    pub fn new(
        employee_code: String,
        name: String,
        gender: Gender,
        department_id: String,
        experience_years: f64,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            employee_id: uuid::Uuid::new_v4().to_string(),
            employee_code,
            name,
            gender,
            department_id,
            manager_id: None,
            designation: None,
            joining_date: None,
            experience_years,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// 工龄区间
    pub fn experience_band(&self) -> ExperienceBand {
        ExperienceBand::from_years(self.experience_years)
    }
}
