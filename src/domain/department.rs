// ==========================================
// 工厂员工技能矩阵管理系统 - 部门/主管领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Department - 部门
// ==========================================
// 约束: 未删除记录中 name 唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub department_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Department {
    /// 创建新部门（生成 ID 与时间戳）
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            department_id: uuid::Uuid::new_v4().to_string(),
            name,
            description,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 部门列表项（带员工/主管计数）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentWithCounts {
    #[serde(flatten)]
    pub department: Department,
    pub employee_count: i64,
    pub manager_count: i64,
}

// ==========================================
// Manager - 主管
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manager {
    pub manager_id: String,
    pub name: String,
    pub email: Option<String>,
    pub department_id: String,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Manager {
    pub fn new(name: String, email: Option<String>, department_id: String) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            manager_id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            department_id,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
