// ==========================================
// 工厂员工技能矩阵管理系统 - 部门绩效快照领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// DepartmentPerformance - 部门月度技能得分
// ==========================================
// 约束: 每个 (department_id, month) 仅一条未删除记录
// 约束: score ∈ [0, 100]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentPerformance {
    pub performance_id: String,
    pub department_id: String,
    pub month: String, // YYYY-MM
    pub score: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// 校验月份格式 YYYY-MM
pub fn is_valid_month(month: &str) -> bool {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok()
        && month.len() == 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_month() {
        assert!(is_valid_month("2026-01"));
        assert!(!is_valid_month("2026-13"));
        assert!(!is_valid_month("2026-1"));
        assert!(!is_valid_month("202601"));
    }
}
