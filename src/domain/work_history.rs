// ==========================================
// 工厂员工技能矩阵管理系统 - 员工作业记录领域模型
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 单日工时上限
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

// ==========================================
// EmployeeWorkHistory - 作业记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeWorkHistory {
    pub history_id: String,
    pub employee_id: String,
    pub machine_id: Option<String>,
    pub department_id: Option<String>,
    pub work_date: NaiveDate,
    pub shift: Option<String>, // 班次
    pub hours_worked: f64,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl EmployeeWorkHistory {
    pub fn new(employee_id: String, work_date: NaiveDate, hours_worked: f64) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            history_id: uuid::Uuid::new_v4().to_string(),
            employee_id,
            machine_id: None,
            department_id: None,
            work_date,
            shift: None,
            hours_worked,
            notes: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
