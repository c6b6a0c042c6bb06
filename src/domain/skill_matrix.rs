// ==========================================
// 工厂员工技能矩阵管理系统 - 技能矩阵快照领域模型
// ==========================================
// 说明: 技能矩阵是向导完成时的反范式快照，
//       之后员工技能的变更不会回写到已保存的矩阵
// ==========================================

use crate::domain::types::{MatrixColumnKind, SkillLevel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 矩阵列（技能或机台）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixColumn {
    pub kind: MatrixColumnKind,
    pub ref_id: String, // skill_id 或 machine_id
    pub label: String,  // 列标题（矩阵内唯一）
}

/// 矩阵行（一名员工）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub employee_id: String,
    pub employee_code: String,
    pub employee_name: String,
    pub cells: BTreeMap<String, SkillLevel>, // 列标题 → 等级
}

impl MatrixRow {
    /// 取单元格等级，缺失视为 None
    pub fn level(&self, label: &str) -> SkillLevel {
        self.cells.get(label).copied().unwrap_or(SkillLevel::None)
    }
}

// ==========================================
// SkillMatrix - 技能矩阵
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatrix {
    pub matrix_id: String,
    pub name: String,
    pub department_ids: Vec<String>,
    pub columns: Vec<MatrixColumn>,
    pub rows: Vec<MatrixRow>,
    pub created_by: String,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SkillMatrix {
    pub fn column_labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }
}

/// 矩阵列表项（不含单元格）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMatrixSummary {
    pub matrix_id: String,
    pub name: String,
    pub department_count: usize,
    pub column_count: usize,
    pub row_count: usize,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl From<&SkillMatrix> for SkillMatrixSummary {
    fn from(m: &SkillMatrix) -> Self {
        Self {
            matrix_id: m.matrix_id.clone(),
            name: m.name.clone(),
            department_count: m.department_ids.len(),
            column_count: m.columns.len(),
            row_count: m.rows.len(),
            created_by: m.created_by.clone(),
            created_at: m.created_at,
        }
    }
}
